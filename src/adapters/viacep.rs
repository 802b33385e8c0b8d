use crate::adapters::{build_http_client, join_segments, parse_base_url};
use crate::domain::model::{Cep, GeocodeOutcome};
use crate::domain::ports::CityLookup;
use crate::utils::error::{Result, ServiceError};
use crate::utils::telemetry::TraceClient;
use async_trait::async_trait;
use opentelemetry::Context;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::de::IgnoredAny;
use serde::Deserialize;
use url::Url;

/// ViaCEP answers 200 for unknown codes too, flagging them with `erro`.
/// Variant order matters: `erro` wins over `localidade`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ViaCepBody {
    Missing {
        #[allow(dead_code)]
        erro: IgnoredAny,
    },
    Found {
        localidade: String,
    },
    // An object with no usable city.
    Unusable(#[allow(dead_code)] serde_json::Map<String, serde_json::Value>),
    // Literal `null`.
    Empty,
}

impl From<ViaCepBody> for GeocodeOutcome {
    fn from(body: ViaCepBody) -> Self {
        match body {
            ViaCepBody::Found { localidade } => GeocodeOutcome::Found { city: localidade },
            ViaCepBody::Missing { .. } | ViaCepBody::Unusable(_) | ViaCepBody::Empty => {
                GeocodeOutcome::NotFound
            }
        }
    }
}

pub(crate) fn decode_body(bytes: &[u8]) -> std::result::Result<GeocodeOutcome, serde_json::Error> {
    serde_json::from_slice::<ViaCepBody>(bytes).map(GeocodeOutcome::from)
}

#[derive(Clone)]
pub struct ViaCepClient {
    client: Client,
    base_url: Url,
    trace: TraceClient,
}

impl ViaCepClient {
    pub fn new(base_url: &str, trace: TraceClient) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: parse_base_url("viacep_url", base_url)?,
            trace,
        })
    }

    fn endpoint(&self, cep: &Cep) -> Result<Url> {
        join_segments(&self.base_url, &["ws", cep.as_str(), "json", ""]).ok_or_else(|| {
            ServiceError::InternalError {
                message: format!("cannot build ViaCEP URL from {}", self.base_url),
            }
        })
    }
}

#[async_trait]
impl CityLookup for ViaCepClient {
    async fn lookup_city(&self, cep: &Cep, cx: &Context) -> Result<GeocodeOutcome> {
        let url = self.endpoint(cep)?;
        let mut headers = HeaderMap::new();
        self.trace.inject(cx, &mut headers);

        tracing::debug!(%cep, %url, "Requesting city from ViaCEP");
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%cep, "ViaCEP request failed: {}", e);
                ServiceError::InternalError {
                    message: format!("ViaCEP request failed: {}", e),
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%cep, %status, "ViaCEP answered with a non-200 status");
            return Ok(GeocodeOutcome::NotFound);
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(%cep, "Failed to read ViaCEP response: {}", e);
            ServiceError::InternalError {
                message: format!("reading ViaCEP response: {}", e),
            }
        })?;

        let outcome = decode_body(&bytes).map_err(|e| {
            tracing::error!(%cep, "Failed to decode ViaCEP response: {}", e);
            ServiceError::InternalError {
                message: format!("decoding ViaCEP response: {}", e),
            }
        })?;

        match &outcome {
            GeocodeOutcome::Found { city } => {
                tracing::info!(%cep, city = %city, "Postal code resolved");
            }
            GeocodeOutcome::NotFound => tracing::warn!(%cep, "Postal code not found"),
        }
        Ok(outcome)
    }
}

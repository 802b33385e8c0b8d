use crate::adapters::{build_http_client, join_segments, parse_base_url};
use crate::domain::model::{Cep, WeatherResult};
use crate::domain::ports::WeatherUpstream;
use crate::utils::error::{Result, ServiceError};
use crate::utils::telemetry::TraceClient;
use async_trait::async_trait;
use opentelemetry::Context;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use url::Url;

/// Calls `GET /weather?cep=` on the orchestration service.
#[derive(Clone)]
pub struct OrchestratorClient {
    client: Client,
    base_url: Url,
    trace: TraceClient,
}

impl OrchestratorClient {
    pub fn new(base_url: &str, trace: TraceClient) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: parse_base_url("orchestrator_url", base_url)?,
            trace,
        })
    }

    fn endpoint(&self, cep: &Cep) -> Result<Url> {
        let mut url = join_segments(&self.base_url, &["weather"]).ok_or_else(|| {
            ServiceError::UpstreamUnreachable {
                message: format!("cannot build orchestrator URL from {}", self.base_url),
            }
        })?;
        url.query_pairs_mut().append_pair("cep", cep.as_str());
        Ok(url)
    }
}

#[async_trait]
impl WeatherUpstream for OrchestratorClient {
    async fn fetch_weather(&self, cep: &Cep, cx: &Context) -> Result<WeatherResult> {
        let url = self.endpoint(cep)?;
        let mut headers = HeaderMap::new();
        self.trace.inject(cx, &mut headers);

        tracing::debug!(%cep, %url, "Forwarding postal code to orchestrator");
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%cep, "Orchestrator request failed: {}", e);
                ServiceError::UpstreamUnreachable {
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%cep, %status, "Orchestrator answered with a non-200 status");
            return Err(ServiceError::UpstreamStatus(status));
        }

        response.json::<WeatherResult>().await.map_err(|e| {
            tracing::error!(%cep, "Failed to decode orchestrator response: {}", e);
            ServiceError::MalformedUpstreamResponse {
                message: e.to_string(),
            }
        })
    }
}

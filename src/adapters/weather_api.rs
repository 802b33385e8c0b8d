use crate::adapters::{build_http_client, join_segments, parse_base_url};
use crate::domain::ports::TemperatureLookup;
use crate::utils::error::{Result, ServiceError};
use crate::utils::telemetry::TraceClient;
use async_trait::async_trait;
use opentelemetry::Context;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
}

#[derive(Clone)]
pub struct WeatherApiClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    trace: TraceClient,
}

impl WeatherApiClient {
    pub fn new(base_url: &str, api_key: Option<String>, trace: TraceClient) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: parse_base_url("weather_api_url", base_url)?,
            api_key,
            trace,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ServiceError::ConfigurationError {
                message: "WEATHER_API_KEY is not set".to_string(),
            })
    }

    fn endpoint(&self, api_key: &str, city: &str) -> Result<Url> {
        let mut url = join_segments(&self.base_url, &["v1", "current.json"]).ok_or_else(|| {
            ServiceError::InternalError {
                message: format!("cannot build weather API URL from {}", self.base_url),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("key", api_key)
            .append_pair("q", city);
        Ok(url)
    }
}

#[async_trait]
impl TemperatureLookup for WeatherApiClient {
    async fn current_celsius(&self, city: &str, cx: &Context) -> Result<f64> {
        let api_key = self.api_key().inspect_err(|e| tracing::error!("{}", e))?;
        let url = self.endpoint(api_key, city)?;
        let mut headers = HeaderMap::new();
        self.trace.inject(cx, &mut headers);

        // The URL carries the API key, keep it out of the logs.
        tracing::debug!(city, "Requesting current conditions");
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!(city, "Weather API request failed: {}", e);
                ServiceError::InternalError {
                    message: format!("weather API request failed: {}", e),
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(city, %status, "Weather API answered with a non-200 status");
            return Err(ServiceError::InternalError {
                message: format!("weather API responded with {}", status),
            });
        }

        let conditions: CurrentConditions = response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!(city, "Failed to decode weather API response: {}", e);
            ServiceError::InternalError {
                message: format!("decoding weather API response: {}", e),
            }
        })?;

        tracing::info!(city, temp_c = conditions.current.temp_c, "Current temperature fetched");
        Ok(conditions.current.temp_c)
    }
}

// Adapters layer: HTTP clients for the collaborators behind the domain ports.

pub mod orchestrator;
pub mod viacep;
pub mod weather_api;

pub use orchestrator::OrchestratorClient;
pub use viacep::ViaCepClient;
pub use weather_api::WeatherApiClient;

use crate::utils::error::{Result, ServiceError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Every outbound call gets this budget; a timeout surfaces as a transport error.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("cep-weather/", env!("CARGO_PKG_VERSION"));

pub fn build_http_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

pub fn parse_base_url(field_name: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| ServiceError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: raw.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}

/// Append path segments to a base URL, percent-encoding each one.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    Some(url)
}

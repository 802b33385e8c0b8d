use crate::domain::model::{Cep, PostalCodeRequest, WeatherResult};
use crate::domain::ports::WeatherUpstream;
use crate::utils::error::{Result, ServiceError};
use crate::utils::telemetry::TraceClient;
use axum::http::HeaderMap;
use opentelemetry::Context;

pub const VALIDATE_SPAN: &str = "cep-input:validate-cep";

/// Validates the posted postal code and relays it to the orchestration service.
pub struct EdgeHandler<U: WeatherUpstream> {
    upstream: U,
    trace: TraceClient,
}

impl<U: WeatherUpstream> EdgeHandler<U> {
    pub fn new(upstream: U, trace: TraceClient) -> Self {
        Self { upstream, trace }
    }

    pub fn continue_trace(&self, headers: &HeaderMap) -> Context {
        self.trace.extract(headers)
    }

    pub async fn handle(&self, body: &[u8], parent: &Context) -> Result<WeatherResult> {
        let request: PostalCodeRequest = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!("Rejecting undecodable request body: {}", e);
            ServiceError::InvalidInput {
                value: String::from_utf8_lossy(body).into_owned(),
            }
        })?;
        let cep = Cep::parse(&request.cep).inspect_err(|e| tracing::warn!("{}", e))?;

        let span = self.trace.start_server_span(VALIDATE_SPAN, parent);
        span.set_attribute("cep", cep.to_string());

        let result = self.upstream.fetch_weather(&cep, span.context()).await;
        span.record_result(&result);
        result
    }
}

use crate::domain::model::{Cep, GeocodeOutcome, WeatherResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use opentelemetry::Context;

/// Postal code to city. Implementations classify the collaborator's answer
/// into a [`GeocodeOutcome`] and only fail for transport-level problems.
#[async_trait]
pub trait CityLookup: Send + Sync {
    async fn lookup_city(&self, cep: &Cep, cx: &Context) -> Result<GeocodeOutcome>;
}

/// City to current temperature in Celsius.
#[async_trait]
pub trait TemperatureLookup: Send + Sync {
    async fn current_celsius(&self, city: &str, cx: &Context) -> Result<f64>;
}

/// The edge's view of the orchestration service.
#[async_trait]
pub trait WeatherUpstream: Send + Sync {
    async fn fetch_weather(&self, cep: &Cep, cx: &Context) -> Result<WeatherResult>;
}

use crate::domain::model::{Cep, GeocodeOutcome, WeatherResult};
use crate::domain::ports::{CityLookup, TemperatureLookup};
use crate::utils::error::{Result, ServiceError};
use crate::utils::telemetry::TraceClient;
use axum::http::HeaderMap;
use opentelemetry::Context;

pub const FETCH_WEATHER_SPAN: &str = "weather-orchestrator:fetch-weather";
pub const FETCH_CITY_SPAN: &str = "weather-orchestrator:fetch-city";
pub const FETCH_TEMPERATURE_SPAN: &str = "weather-orchestrator:fetch-temperature";

/// Resolves a postal code to a city, then the city to its current temperature.
///
/// Failures classify asymmetrically: a geocoder that answers but does not know the
/// code yields `ZipcodeNotFound` (404), while any weather-side failure is an
/// internal error (500).
pub struct OrchestrationHandler<G: CityLookup, W: TemperatureLookup> {
    geocoder: G,
    weather: W,
    trace: TraceClient,
}

impl<G: CityLookup, W: TemperatureLookup> OrchestrationHandler<G, W> {
    pub fn new(geocoder: G, weather: W, trace: TraceClient) -> Self {
        Self {
            geocoder,
            weather,
            trace,
        }
    }

    pub fn continue_trace(&self, headers: &HeaderMap) -> Context {
        self.trace.extract(headers)
    }

    pub async fn handle(&self, raw_cep: &str, parent: &Context) -> Result<WeatherResult> {
        let cep = Cep::parse(raw_cep).inspect_err(|e| tracing::warn!("{}", e))?;

        let span = self.trace.start_server_span(FETCH_WEATHER_SPAN, parent);
        span.set_attribute("cep", cep.to_string());

        let result = self.resolve(&cep, span.context()).await;
        span.record_result(&result);
        result
    }

    async fn resolve(&self, cep: &Cep, cx: &Context) -> Result<WeatherResult> {
        let city = self.fetch_city(cep, cx).await?;
        let celsius = self.fetch_temperature(&city, cx).await?;
        Ok(WeatherResult::from_celsius(city, celsius))
    }

    async fn fetch_city(&self, cep: &Cep, parent: &Context) -> Result<String> {
        let span = self.trace.start_client_span(FETCH_CITY_SPAN, parent);

        let result = match self.geocoder.lookup_city(cep, span.context()).await {
            Ok(GeocodeOutcome::Found { city }) => {
                span.set_attribute("city", city.clone());
                Ok(city)
            }
            Ok(GeocodeOutcome::NotFound) => Err(ServiceError::ZipcodeNotFound {
                cep: cep.to_string(),
            }),
            Err(e) => Err(e),
        };
        span.record_result(&result);
        result
    }

    async fn fetch_temperature(&self, city: &str, parent: &Context) -> Result<f64> {
        let span = self.trace.start_client_span(FETCH_TEMPERATURE_SPAN, parent);
        span.set_attribute("city", city.to_string());

        let result = self.weather.current_celsius(city, span.context()).await;
        span.record_result(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use opentelemetry::trace::{SpanId, Status};
    use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
    use opentelemetry_sdk::trace::TracerProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubGeocoder(fn() -> Result<GeocodeOutcome>);

    #[async_trait]
    impl CityLookup for StubGeocoder {
        async fn lookup_city(&self, _cep: &Cep, _cx: &Context) -> Result<GeocodeOutcome> {
            (self.0)()
        }
    }

    struct StubWeather {
        calls: AtomicUsize,
        answer: fn() -> Result<f64>,
    }

    #[async_trait]
    impl TemperatureLookup for StubWeather {
        async fn current_celsius(&self, _city: &str, _cx: &Context) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.answer)()
        }
    }

    fn found() -> Result<GeocodeOutcome> {
        Ok(GeocodeOutcome::Found {
            city: "São Paulo".to_string(),
        })
    }

    fn handler(
        geocode: fn() -> Result<GeocodeOutcome>,
        weather: fn() -> Result<f64>,
    ) -> (
        OrchestrationHandler<StubGeocoder, StubWeather>,
        InMemorySpanExporter,
    ) {
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let handler = OrchestrationHandler::new(
            StubGeocoder(geocode),
            StubWeather {
                calls: AtomicUsize::new(0),
                answer: weather,
            },
            TraceClient::new(&provider, "test"),
        );
        (handler, exporter)
    }

    #[tokio::test]
    async fn test_composes_weather_result() {
        let (handler, _) = handler(found, || Ok(25.0));

        let result = handler.handle("01001000", &Context::new()).await.unwrap();

        assert_eq!(result, WeatherResult::from_celsius("São Paulo", 25.0));
        assert_eq!(result.temp_f, 77.0);
        assert_eq!(result.temp_k, 298.0);
    }

    #[tokio::test]
    async fn test_invalid_cep_opens_no_span() {
        let (handler, exporter) = handler(found, || Ok(25.0));

        let err = handler.handle("123", &Context::new()).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(handler.weather.calls.load(Ordering::SeqCst), 0);
        assert!(exporter.get_finished_spans().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_skips_weather_lookup() {
        let (handler, _) = handler(|| Ok(GeocodeOutcome::NotFound), || Ok(25.0));

        let err = handler.handle("99999999", &Context::new()).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "can not find zipcode");
        assert_eq!(handler.weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_geocoder_transport_failure_is_internal() {
        let (handler, _) = handler(
            || {
                Err(ServiceError::InternalError {
                    message: "connection refused".to_string(),
                })
            },
            || Ok(25.0),
        );

        let err = handler.handle("01001000", &Context::new()).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[tokio::test]
    async fn test_weather_failure_is_internal_not_not_found() {
        let (handler, _) = handler(found, || {
            Err(ServiceError::ConfigurationError {
                message: "WEATHER_API_KEY is not set".to_string(),
            })
        });

        let err = handler.handle("01001000", &Context::new()).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[tokio::test]
    async fn test_spans_nest_and_close_on_success() {
        let (handler, exporter) = handler(found, || Ok(25.0));

        handler.handle("01001000", &Context::new()).await.unwrap();

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 3);
        let root = spans.iter().find(|s| s.name == FETCH_WEATHER_SPAN).unwrap();
        let city = spans.iter().find(|s| s.name == FETCH_CITY_SPAN).unwrap();
        let temp = spans.iter().find(|s| s.name == FETCH_TEMPERATURE_SPAN).unwrap();

        assert_eq!(root.parent_span_id, SpanId::INVALID);
        assert_eq!(city.parent_span_id, root.span_context.span_id());
        assert_eq!(temp.parent_span_id, root.span_context.span_id());
        assert_eq!(city.span_context.trace_id(), root.span_context.trace_id());
        assert!(matches!(root.status, Status::Ok));
    }

    #[tokio::test]
    async fn test_spans_close_on_early_return() {
        let (handler, exporter) = handler(|| Ok(GeocodeOutcome::NotFound), || Ok(25.0));

        handler.handle("99999999", &Context::new()).await.unwrap_err();

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| matches!(s.status, Status::Error { .. })));
        assert!(!spans.iter().any(|s| s.name == FETCH_TEMPERATURE_SPAN));
    }
}

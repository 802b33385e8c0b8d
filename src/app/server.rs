use crate::core::{
    CityLookup, EdgeHandler, OrchestrationHandler, TemperatureLookup, WeatherResult,
    WeatherUpstream,
};
use crate::utils::error::Result;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub fn edge_router<U>(handler: EdgeHandler<U>) -> Router
where
    U: WeatherUpstream + 'static,
{
    Router::new()
        .route("/cep", post(post_cep::<U>))
        .with_state(Arc::new(handler))
        .layer(TraceLayer::new_for_http())
}

pub fn orchestrator_router<G, W>(handler: OrchestrationHandler<G, W>) -> Router
where
    G: CityLookup + 'static,
    W: TemperatureLookup + 'static,
{
    Router::new()
        .route("/weather", get(get_weather::<G, W>))
        .with_state(Arc::new(handler))
        .layer(TraceLayer::new_for_http())
}

async fn post_cep<U>(
    State(handler): State<Arc<EdgeHandler<U>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WeatherResult>>
where
    U: WeatherUpstream + 'static,
{
    let parent = handler.continue_trace(&headers);
    handler.handle(&body, &parent).await.map(Json)
}

async fn get_weather<G, W>(
    State(handler): State<Arc<OrchestrationHandler<G, W>>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<WeatherResult>>
where
    G: CityLookup + 'static,
    W: TemperatureLookup + 'static,
{
    let parent = handler.continue_trace(&headers);
    let cep = cep_from_query(query.as_deref());
    handler.handle(&cep, &parent).await.map(Json)
}

/// First `cep` value in the query string, empty when absent.
pub fn cep_from_query(query: Option<&str>) -> String {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "cep")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

/// Serve until Ctrl-C or SIGTERM, letting in-flight requests finish.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cep_from_query() {
        assert_eq!(cep_from_query(Some("cep=01001000")), "01001000");
        assert_eq!(cep_from_query(Some("units=c&cep=01001000&cep=2")), "01001000");
        assert_eq!(cep_from_query(Some("cep=0100%201")), "0100 1");
        assert_eq!(cep_from_query(Some("units=c")), "");
        assert_eq!(cep_from_query(None), "");
    }
}

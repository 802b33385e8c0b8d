use anyhow::Context as _;
use cep_weather::app::{edge_router, serve, EDGE_SERVICE_NAME};
use cep_weather::utils::telemetry::{init_tracer_provider, shutdown_tracer_provider};
use cep_weather::utils::{logger, validation::Validate};
use cep_weather::{EdgeConfig, EdgeHandler, OrchestratorClient, TraceClient};
use clap::Parser;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = EdgeConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting cep-input");
    if config.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let provider = init_tracer_provider(EDGE_SERVICE_NAME, config.collector_endpoint.as_deref())?;
    let trace = TraceClient::new(&provider, EDGE_SERVICE_NAME);

    let upstream = OrchestratorClient::new(&config.orchestrator_url, trace.clone())?;
    let router = edge_router(EdgeHandler::new(upstream, trace));

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    tracing::info!(
        "cep-input listening on port {}, forwarding to {}",
        config.port,
        config.orchestrator_url
    );

    let served = serve(listener, router).await;
    shutdown_tracer_provider(&provider);
    served.context("serving HTTP")?;

    tracing::info!("cep-input stopped");
    Ok(())
}

use anyhow::Context as _;
use cep_weather::app::{orchestrator_router, serve, ORCHESTRATOR_SERVICE_NAME};
use cep_weather::utils::telemetry::{init_tracer_provider, shutdown_tracer_provider};
use cep_weather::utils::{logger, validation::Validate};
use cep_weather::{OrchestrationHandler, OrchestratorConfig, TraceClient, ViaCepClient, WeatherApiClient};
use clap::Parser;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = OrchestratorConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting weather-orchestrator");
    if config.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let provider =
        init_tracer_provider(ORCHESTRATOR_SERVICE_NAME, config.collector_endpoint.as_deref())?;
    let trace = TraceClient::new(&provider, ORCHESTRATOR_SERVICE_NAME);

    let geocoder = ViaCepClient::new(&config.viacep_url, trace.clone())?;
    let weather = WeatherApiClient::new(
        &config.weather_api_url,
        config.weather_api_key.clone(),
        trace.clone(),
    )?;
    let router = orchestrator_router(OrchestrationHandler::new(geocoder, weather, trace));

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    tracing::info!("weather-orchestrator listening on port {}", config.port);

    let served = serve(listener, router).await;
    shutdown_tracer_provider(&provider);
    served.context("serving HTTP")?;

    tracing::info!("weather-orchestrator stopped");
    Ok(())
}

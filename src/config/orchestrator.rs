use crate::utils::error::Result;
use crate::utils::validation::{validate_optional_url, validate_port, validate_url, Validate};
use clap::Parser;

#[derive(Clone, Parser)]
#[command(name = "weather-orchestrator")]
#[command(about = "Resolves a postal code to its city's current temperature")]
pub struct OrchestratorConfig {
    #[arg(long, env = "PORT", default_value = "8081")]
    pub port: u16,

    #[arg(long, env = "VIACEP_URL", default_value = "https://viacep.com.br")]
    pub viacep_url: String,

    #[arg(long, env = "WEATHER_API_URL", default_value = "http://api.weatherapi.com")]
    pub weather_api_url: String,

    /// Checked per request; a missing key fails lookups, not startup
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: Option<String>,

    /// OTLP collector endpoint; spans are not exported when unset
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub collector_endpoint: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "LOG_JSON", help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

// Hand-written so the API key never reaches the logs.
impl std::fmt::Debug for OrchestratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorConfig")
            .field("port", &self.port)
            .field("viacep_url", &self.viacep_url)
            .field("weather_api_url", &self.weather_api_url)
            .field(
                "weather_api_key",
                &self.weather_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("collector_endpoint", &self.collector_endpoint)
            .field("verbose", &self.verbose)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl Validate for OrchestratorConfig {
    fn validate(&self) -> Result<()> {
        validate_port("port", self.port)?;
        validate_url("viacep_url", &self.viacep_url)?;
        validate_url("weather_api_url", &self.weather_api_url)?;
        validate_optional_url("collector_endpoint", self.collector_endpoint.as_deref())?;

        if self.weather_api_key.as_deref().map_or(true, str::is_empty) {
            tracing::warn!("WEATHER_API_KEY is not set, temperature lookups will fail");
        }

        tracing::info!("✅ Orchestrator configuration validation passed");
        Ok(())
    }
}

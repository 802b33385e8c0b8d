use crate::utils::error::Result;
use crate::utils::validation::{validate_optional_url, validate_port, validate_url, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "cep-input")]
#[command(about = "Validates a postal code and forwards it to the weather orchestrator")]
pub struct EdgeConfig {
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    #[arg(long, env = "ORCHESTRATOR_URL", default_value = "http://serviceb:8081")]
    pub orchestrator_url: String,

    /// OTLP collector endpoint; spans are not exported when unset
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub collector_endpoint: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "LOG_JSON", help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl Validate for EdgeConfig {
    fn validate(&self) -> Result<()> {
        validate_port("port", self.port)?;
        validate_url("orchestrator_url", &self.orchestrator_url)?;
        validate_optional_url("collector_endpoint", self.collector_endpoint.as_deref())?;

        tracing::info!("✅ Edge configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EdgeConfig::try_parse_from(["cep-input"]).unwrap();
        assert_eq!(config.orchestrator_url, "http://serviceb:8081");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_orchestrator_url() {
        let config =
            EdgeConfig::try_parse_from(["cep-input", "--orchestrator-url", "serviceb"]).unwrap();
        assert!(config.validate().is_err());
    }
}

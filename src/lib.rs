pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{OrchestratorClient, ViaCepClient, WeatherApiClient};
pub use config::{EdgeConfig, OrchestratorConfig};
pub use crate::core::{EdgeHandler, OrchestrationHandler};
pub use utils::error::{Result, ServiceError};
pub use utils::telemetry::TraceClient;

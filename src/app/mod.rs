pub mod server;

pub use server::{edge_router, orchestrator_router, serve};

/// Service names reported on the `service.name` trace resource.
pub const EDGE_SERVICE_NAME: &str = "cep-input";
pub const ORCHESTRATOR_SERVICE_NAME: &str = "weather-orchestrator";

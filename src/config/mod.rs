pub mod edge;
pub mod orchestrator;

pub use edge::EdgeConfig;
pub use orchestrator::OrchestratorConfig;

pub mod edge;
pub mod orchestration;

pub use crate::domain::model::{Cep, GeocodeOutcome, PostalCodeRequest, WeatherResult};
pub use crate::domain::ports::{CityLookup, TemperatureLookup, WeatherUpstream};
pub use crate::utils::error::Result;
pub use edge::EdgeHandler;
pub use orchestration::OrchestrationHandler;

use crate::utils::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CEP_LENGTH: usize = 8;

/// Body of `POST /cep`. A missing field decodes as empty and fails [`Cep::parse`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostalCodeRequest {
    #[serde(default)]
    pub cep: String,
}

/// A postal code that passed the shape check: exactly eight bytes of UTF-8.
/// Digits are not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cep(String);

impl Cep {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() != CEP_LENGTH {
            return Err(ServiceError::InvalidInput {
                value: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherResult {
    pub fn from_celsius(city: impl Into<String>, celsius: f64) -> Self {
        Self {
            city: city.into(),
            temp_c: celsius,
            temp_f: celsius_to_fahrenheit(celsius),
            temp_k: celsius_to_kelvin(celsius),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.0
}

/// What the geocoding collaborator said about a postal code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeOutcome {
    Found { city: String },
    NotFound,
}

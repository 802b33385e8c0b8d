use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub const INVALID_ZIPCODE: &str = "Invalid zipcode";
pub const CAN_NOT_FIND_ZIPCODE: &str = "can not find zipcode";
pub const INTERNAL_SERVER_ERROR: &str = "internal server error";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid postal code: {value:?}")]
    InvalidInput { value: String },

    #[error("Postal code not found: {cep}")]
    ZipcodeNotFound { cep: String },

    #[error("Upstream unreachable: {message}")]
    UpstreamUnreachable { message: String },

    #[error("Upstream responded with status {0}")]
    UpstreamStatus(StatusCode),

    #[error("Malformed upstream response: {message}")]
    MalformedUpstreamResponse { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] opentelemetry::trace::TraceError),

    #[error("Invalid value for '{field}': {value:?} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::ZipcodeNotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::UpstreamStatus(status) => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed text written to the response body. Diagnostic detail never leaks here.
    pub fn public_message(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput { .. } => INVALID_ZIPCODE,
            ServiceError::ZipcodeNotFound { .. } | ServiceError::UpstreamStatus(_) => {
                CAN_NOT_FIND_ZIPCODE
            }
            _ => INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label recorded as the `error.type` span attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput { .. } => "invalid_input",
            ServiceError::ZipcodeNotFound { .. } => "zipcode_not_found",
            ServiceError::UpstreamUnreachable { .. } => "upstream_unreachable",
            ServiceError::UpstreamStatus(_) => "upstream_status",
            ServiceError::MalformedUpstreamResponse { .. } => "malformed_upstream_response",
            ServiceError::ConfigurationError { .. } | ServiceError::InvalidConfigValueError { .. } => {
                "configuration_error"
            }
            _ => "internal_error",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), self.public_message()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let invalid = ServiceError::InvalidInput {
            value: "123".to_string(),
        };
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(invalid.public_message(), "Invalid zipcode");

        let missing = ServiceError::ZipcodeNotFound {
            cep: "99999999".to_string(),
        };
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.public_message(), "can not find zipcode");

        let relayed = ServiceError::UpstreamStatus(StatusCode::BAD_GATEWAY);
        assert_eq!(relayed.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(relayed.public_message(), "can not find zipcode");
    }

    #[test]
    fn test_configuration_and_internal_errors_look_the_same() {
        let config = ServiceError::ConfigurationError {
            message: "WEATHER_API_KEY is not set".to_string(),
        };
        let internal = ServiceError::InternalError {
            message: "connection refused".to_string(),
        };

        assert_eq!(config.status_code(), internal.status_code());
        assert_eq!(config.public_message(), internal.public_message());
        assert_ne!(config.kind(), internal.kind());
    }

    #[test]
    fn test_public_message_hides_details() {
        let err = ServiceError::UpstreamUnreachable {
            message: "dns error: serviceb".to_string(),
        };
        assert_eq!(err.public_message(), "internal server error");
        assert!(err.to_string().contains("serviceb"));
    }
}

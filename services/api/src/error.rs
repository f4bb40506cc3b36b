use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roster_engine::config::SettingsError;
use roster_engine::roster::StaffImportError;
use roster_engine::telemetry::TelemetryError;
use roster_engine::{ConfigError, InputError};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Settings(SettingsError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Config(ConfigError),
    Input(InputError),
    Import(StaffImportError),
    Json(serde_json::Error),
    MissingRules,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Settings(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Config(err) => write!(f, "invalid rules or profile: {}", err),
            AppError::Input(err) => write!(f, "invalid schedule: {}", err),
            AppError::Import(err) => write!(f, "staff import failed: {}", err),
            AppError::Json(err) => write!(f, "malformed document: {}", err),
            AppError::MissingRules => write!(
                f,
                "no rule set supplied and ROSTER_RULES_PATH is not configured"
            ),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Settings(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::MissingRules => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Config(_)
            | AppError::Input(_)
            | AppError::Import(_)
            | AppError::Json(_)
            | AppError::MissingRules => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Settings(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Input(err) => json!({ "error": self.to_string(), "code": err.code() }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<SettingsError> for AppError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<InputError> for AppError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<StaffImportError> for AppError {
    fn from(value: StaffImportError) -> Self {
        Self::Import(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

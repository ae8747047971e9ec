//! Error handling for the orchard engine service
//!
//! Provides consistent error responses in English and Vietnamese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{CoordinateField, RelocationError, SettingsError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_vi: String,
    },

    // Business logic errors
    #[error("Relocation rejected: {0}")]
    RelocationRejected(#[from] RelocationError),

    #[error("Invalid engine settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_vi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Machine-readable payload, e.g. the computed distance of a rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

fn coordinate_field_vi(field: CoordinateField) -> &'static str {
    match field {
        CoordinateField::Latitude => "vĩ độ",
        CoordinateField::Longitude => "kinh độ",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_vi,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_vi: message_vi.clone(),
                    field: Some(field.clone()),
                    details: None,
                },
            ),
            AppError::RelocationRejected(RelocationError::OutOfRange(range)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "COORDINATE_OUT_OF_RANGE".to_string(),
                    message_en: format!(
                        "The {} {} must be between {} and {}",
                        range.field, range.value, range.min, range.max
                    ),
                    message_vi: format!(
                        "Giá trị {} {} phải nằm trong khoảng {} đến {}",
                        coordinate_field_vi(range.field),
                        range.value,
                        range.min,
                        range.max
                    ),
                    field: Some(range.field.to_string()),
                    details: serde_json::to_value(range).ok(),
                },
            ),
            AppError::RelocationRejected(
                rejection @ RelocationError::TooFarFromPrevious {
                    distance_meters,
                    max_distance_meters,
                },
            ) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "RELOCATION_TOO_FAR".to_string(),
                    message_en: format!(
                        "The new position is {:.1} m away from the previous one (maximum {:.1} m)",
                        distance_meters, max_distance_meters
                    ),
                    message_vi: format!(
                        "Vị trí mới cách vị trí cũ {:.1} m (tối đa {:.1} m)",
                        distance_meters, max_distance_meters
                    ),
                    field: Some("proposed".to_string()),
                    details: serde_json::to_value(rejection).ok(),
                },
            ),
            AppError::RelocationRejected(
                rejection @ RelocationError::InvalidThreshold {
                    max_distance_meters,
                    message,
                },
            ) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: format!("{} (got {})", message, max_distance_meters),
                    message_vi: "Ngưỡng khoảng cách không hợp lệ".to_string(),
                    field: Some("maxDistanceMeters".to_string()),
                    details: serde_json::to_value(rejection).ok(),
                },
            ),
            AppError::InvalidSettings(SettingsError::Invalid { key, message }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INVALID_SETTINGS".to_string(),
                    message_en: format!("Invalid setting {}: {}", key, message),
                    message_vi: format!("Cấu hình không hợp lệ: {}", key),
                    field: Some(key.to_string()),
                    details: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_vi: format!("Lỗi cấu hình: {}", msg),
                    field: None,
                    details: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::info!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a field validation failure
    pub fn validation(field: &str, message: &str, message_vi: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_vi: message_vi.to_string(),
        }
    }
}

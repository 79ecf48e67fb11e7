//! Standard JSON envelope returned by every service.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// Body shape for operations that only confirm what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confirmation {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl Confirmation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            to: None,
        }
    }
}

pub type Envelope<T> = (StatusCode, Json<ApiResponse<T>>);

/// 200 with `{success: true, data}`.
pub fn ok<T: Serialize>(data: T) -> Envelope<T> {
    (StatusCode::OK, Json(ApiResponse::data(data)))
}

/// 201 with `{success: true, data}`.
pub fn created<T: Serialize>(data: T) -> Envelope<T> {
    (StatusCode::CREATED, Json(ApiResponse::data(data)))
}

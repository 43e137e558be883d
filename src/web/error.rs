//! `CatalogError` から HTTP レスポンスへの変換

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::CatalogError;
use crate::web::models::ErrorResponse;

/// ストア障害時にクライアントへ返す文言 (詳細はログのみ)
const STORE_FAILURE_MESSAGE: &str = "internal storage error";

/// ハンドラのエラー型
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = match &err {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::MalformedPayload(_) | CatalogError::StoreFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if err.is_expected() {
            tracing::info!(target: "web::tools", error = %err, "request rejected");
        } else {
            tracing::error!(target: "web::tools", error = ?err, "request failed");
        }
        let message = match err {
            CatalogError::StoreFailure(_) => STORE_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(target: "web::tools", error = %rejection, "invalid request body");
        Self { status: rejection.status(), message: rejection.body_text() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { message: self.message })).into_response()
    }
}

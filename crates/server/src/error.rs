use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinescope_catalog::CatalogError;
use cinescope_core::error::{ApiError, ErrorEnvelope};
use tracing::warn;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        warn!(error = %e, "catalog request failed");
        Self(match e {
            CatalogError::Fetch { status: 404, message } => ApiError::NotFound(message),
            CatalogError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            other => ApiError::BadGateway(other.to_string()),
        })
    }
}

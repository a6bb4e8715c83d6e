use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Rejections produced by the gate's extractors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GateError {
    /// The gate resolved no identity for this request.
    #[error("Not authenticated")]
    Unauthenticated,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()).into_response(),
        }
    }
}

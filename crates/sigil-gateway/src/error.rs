use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sigil_shortener::ShortenerError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

pub enum AppError {
    /// The token does not resolve to a stored URL. Malformed, forged, and
    /// unknown tokens all land here and produce identical responses.
    NotFound,
    Shortener(ShortenerError),
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        Self::Shortener(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "short url not found".to_owned()),
            AppError::Shortener(ShortenerError::InvalidUrl(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Shortener(err) => {
                error!(%err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

use crate::error::{AppError, Result};
use crate::model::{CreateLinkRequest, CreateLinkResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use sigil_shortener::ShortenParams;

pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>)> {
    let shortened = state
        .shortener()
        .shorten(ShortenParams {
            long_url: request.long_url,
            custom_suffix: request.custom_suffix,
        })
        .await?;

    let response = CreateLinkResponse {
        short_url: shortened.token.to_url(state.base_url()),
        token: shortened.token.to_string(),
        long_url: shortened.long_url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect> {
    match state.shortener().resolve(&token).await? {
        Some(record) => Ok(Redirect::temporary(&record.long_url)),
        None => Err(AppError::NotFound),
    }
}

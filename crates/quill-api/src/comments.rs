use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use quill_core::mutations;
use quill_core::session::AuthorizedContext;
use quill_types::api::CreateCommentRequest;

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthorizedContext>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.body.trim().is_empty() {
        return Err(ApiError::BadRequest("comment must not be empty"));
    }

    let comment = blocking(move || mutations::create_comment(&state.db, &ctx, req)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Extension(ctx): Extension<AuthorizedContext>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(move || mutations::delete_comment(&state.db, &ctx, comment_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

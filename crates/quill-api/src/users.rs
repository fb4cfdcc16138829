use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use quill_core::mutations;
use quill_core::read_model;
use quill_core::session::AuthorizedContext;
use quill_types::api::UserPatch;

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

/// Public user page: profile, posts, comments-with-post-titles. Never the
/// email or credentials.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let page = blocking(move || read_model::user_profile(&state.db, user_id)).await?;
    Ok(Json(page))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(ctx): Extension<AuthorizedContext>,
    Json(patch): Json<UserPatch>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(password) = &patch.password {
        if password.len() < 8 {
            return Err(ApiError::BadRequest("password must be at least 8 characters"));
        }
    }

    let user = blocking(move || mutations::update_user(&state.db, &ctx, user_id, patch)).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(ctx): Extension<AuthorizedContext>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(move || mutations::delete_user(&state.db, &ctx, user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

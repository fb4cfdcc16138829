use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use quill_core::read_model::{self, PostFilter};
use quill_core::session::AuthorizedContext;
use quill_core::mutations;
use quill_types::api::{CreatePostRequest, PostPatch};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = blocking(move || read_model::list_posts(&state.db, PostFilter::default())).await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = blocking(move || read_model::get_post(&state.db, post_id)).await?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthorizedContext>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty"));
    }

    let post = blocking(move || mutations::create_post(&state.db, &ctx, req)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(ctx): Extension<AuthorizedContext>,
    Json(patch): Json<PostPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let post = blocking(move || mutations::update_post(&state.db, &ctx, post_id, patch)).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(ctx): Extension<AuthorizedContext>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(move || mutations::delete_post(&state.db, &ctx, post_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

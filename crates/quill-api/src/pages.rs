use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use quill_core::CoreError;
use quill_core::read_model::{self, PostFilter};
use quill_core::session::AuthorizedContext;

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

/// Dashboard data: the caller's own posts, fully decorated. Runs behind
/// the page gate policy, so an anonymous hit redirects to /login instead.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthorizedContext>,
) -> Result<impl IntoResponse, ApiError> {
    let posts =
        blocking(move || read_model::list_posts(&state.db, PostFilter::owned_by(ctx.user_id)))
            .await?;
    Ok(Json(posts))
}

/// Data for the edit form. Only the owner has anything to edit here.
pub async fn dashboard_edit(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(ctx): Extension<AuthorizedContext>,
) -> Result<impl IntoResponse, ApiError> {
    let post = blocking(move || {
        let post = read_model::get_post(&state.db, post_id)?;
        if post.author.id != ctx.user_id {
            return Err(CoreError::Forbidden);
        }
        Ok(post)
    })
    .await?;
    Ok(Json(post))
}

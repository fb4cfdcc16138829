pub mod auth;
pub mod comments;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod posts;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tracing::error;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::{require_auth, require_auth_page};
use quill_core::CoreResult;

/// The full route table. The transport concerns above it (CORS, request
/// tracing, the listener) stay in the server binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/users", post(auth::register))
        .route("/api/users/login", post(auth::login))
        // Not behind the gate: `session::end` is its own check, and a
        // stale token must surface as "no active session", not 401.
        .route("/api/users/logout", post(auth::logout))
        .route("/api/users/{user_id}", get(users::get_user))
        .route("/api/posts", get(posts::list_posts))
        .route("/api/posts/{post_id}", get(posts::get_post))
        .with_state(state.clone());

    // API gate policy: refusal is a 401 JSON body.
    let protected_routes = Router::new()
        .route("/api/users/{user_id}", put(users::update_user))
        .route("/api/users/{user_id}", delete(users::delete_user))
        .route("/api/posts", post(posts::create_post))
        .route("/api/posts/{post_id}", put(posts::update_post))
        .route("/api/posts/{post_id}", delete(posts::delete_post))
        .route("/api/comments", post(comments::create_comment))
        .route("/api/comments/{comment_id}", delete(comments::delete_comment))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state.clone());

    // Page gate policy: refusal redirects to /login.
    let dashboard_routes = Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/dashboard/edit/{post_id}", get(pages::dashboard_edit))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth_page,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(dashboard_routes)
}

/// Run synchronous core/database work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::from(quill_core::CoreError::Store(anyhow::anyhow!(
                "worker task failed: {e}"
            )))
        })?
        .map_err(ApiError::from)
}

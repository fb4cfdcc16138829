use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use quill_core::session::{self, AuthorizedContext};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "quill_session";

/// One gate decision; the two policies below only differ in how they
/// render a refusal.
async fn gate(state: &AppState, headers: &HeaderMap) -> Result<AuthorizedContext, ApiError> {
    let token = CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string());

    let state = state.clone();
    blocking(move || session::authorize(&state.db, token.as_deref())).await
}

/// API policy: refusal surfaces as 401 with a JSON error body.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = gate(&state, req.headers()).await?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Page policy: refusal redirects to the login page.
pub async fn require_auth_page(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match gate(&state, req.headers()).await {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(_) => Redirect::to("/login").into_response(),
    }
}

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use quill_core::{credentials, session};
use quill_db::Database;
use quill_types::api::{LoginRequest, LoginResponse, RegisterRequest};

use crate::blocking;
use crate::error::ApiError;
use crate::middleware::SESSION_COOKIE;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(ApiError::BadRequest("username must be 3-32 characters"));
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest("password must be at least 8 characters"));
    }
    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("email is not valid"));
    }

    // Hash + insert + session start all happen on the blocking pool; the
    // session is durable before the response (and cookie) leave here.
    let (user, new_session) = blocking(move || {
        let user = credentials::register(&state.db, &req.username, &req.email, &req.password)?;
        let new_session = session::start(&state.db, user.id, &user.username)?;
        Ok((user, new_session))
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(new_session.token.to_string())),
        Json(LoginResponse {
            user_id: user.id,
            username: user.username,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, new_session) = blocking(move || {
        let user = credentials::verify(&state.db, &req.email, &req.password)?;
        let new_session = session::start(&state.db, user.id, &user.username)?;
        Ok((user, new_session))
    })
    .await?;

    Ok((
        jar.add(session_cookie(new_session.token.to_string())),
        Json(LoginResponse {
            user_id: user.id,
            username: user.username,
        }),
    ))
}

/// Ends the caller's session. A second logout with the same cookie gets a
/// 404 ("no active session") rather than succeeding silently.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(quill_core::CoreError::NoActiveSession)?;

    blocking(move || session::end(&state.db, &token)).await?;

    Ok((
        StatusCode::NO_CONTENT,
        jar.remove(Cookie::build(SESSION_COOKIE).path("/").build()),
    ))
}

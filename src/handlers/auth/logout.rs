// handlers/auth/logout.rs - GET /api/auth/logout handler

use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::middleware::clear_session_cookies;
use crate::state::AppState;

/// Always succeeds; a bearer token, when sent, is forwarded to end the provider session
pub async fn logout_get(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> (CookieJar, Json<Value>) {
    state.auth.logout(bearer_token(&headers)).await;

    (
        clear_session_cookies(jar),
        Json(json!({ "message": "Logged out" })),
    )
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

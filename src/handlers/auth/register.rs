// handlers/auth/register.rs - POST /api/auth/register handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::middleware::set_session_cookies;
use crate::onboarding::RegisterRequest;
use crate::state::AppState;

/// Creates the account from the final wizard step. Assigning the default
/// package is best-effort and never fails the request.
pub async fn register_post(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, CookieJar, Json<Value>)> {
    let Json(request) = payload?;
    let user = state.auth.register(&request).await?;

    Ok((
        StatusCode::CREATED,
        set_session_cookies(jar, &state.cookies),
        Json(json!({
            "message": "User registered successfully",
            "user": {
                "id": user.id,
                "email": user.email,
            }
        })),
    ))
}

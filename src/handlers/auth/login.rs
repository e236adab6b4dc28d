// handlers/auth/login.rs - POST /api/auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::gateway::models::ProfileRow;
use crate::middleware::set_session_cookies;
use crate::session::NormalizedEntitlement;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginUser<'a> {
    id: Uuid,
    email: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_data: Option<&'a ProfileRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription: Option<&'a NormalizedEntitlement>,
}

/// Exchanges credentials for a provider session, then sets both gate cookies.
///
/// Profile and subscription are enrichment: when either lookup fails the login
/// still succeeds, with an empty name or no subscription.
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let Json(body) = payload?;
    let outcome = state.auth.login(&body.email, &body.password).await?;

    let user = LoginUser {
        id: outcome.profile.id,
        email: &outcome.profile.email,
        name: &outcome.profile.name,
        profile_data: outcome.profile_row.as_ref(),
        subscription: outcome.entitlement.as_ref(),
    };
    let response = json!({
        "user": user,
        "session": {
            "access_token": outcome.session.access_token,
            "refresh_token": outcome.session.refresh_token,
            "expires_at": outcome.session.expires_at,
        }
    });

    Ok((set_session_cookies(jar, &state.cookies), Json(response)))
}

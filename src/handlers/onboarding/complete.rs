// handlers/onboarding/complete.rs - POST /api/onboarding/complete handler

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::middleware::cookies::onboarding_cookie;
use crate::state::AppState;

pub async fn complete_post(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        jar.add(onboarding_cookie(&state.cookies)),
        Json(json!({
            "success": true,
            "message": "Onboarding completed"
        })),
    )
}

// handlers/auth/subscription.rs - GET /api/auth/subscription?userId= handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscriptionQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// `{"subscription": null}` when the user has no active subscription
pub async fn subscription_get(
    State(state): State<AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> ApiResult<Json<Value>> {
    let raw = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("User id is required"))?;
    let user_id = Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid user id"))?;

    let subscription = state.entitlements.fetch(user_id).await?;
    Ok(Json(json!({ "subscription": subscription })))
}

// handlers/onboarding/options.rs - GET /api/onboarding/options handler

use axum::Json;
use serde_json::{json, Value};

use crate::onboarding::{INSTRUCTION_LEVELS, REGIONS};

/// Choices offered by the wizard's education and location steps
pub async fn options_get() -> Json<Value> {
    Json(json!({
        "instructionLevels": INSTRUCTION_LEVELS,
        "regions": REGIONS,
    }))
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const USER_SUBSCRIPTIONS: &str = "user_subscriptions";
pub const SUBSCRIPTION_PACKAGES: &str = "subscription_packages";

/// Catalog entry of `subscription_packages`; read-only here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPackage {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub features: Option<BTreeMap<String, bool>>,
}

/// Row of `user_subscriptions`, optionally joined with its package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_id: Uuid,
    pub credits_remaining: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "subscription_packages", default, skip_serializing_if = "Option::is_none")]
    pub package: Option<SubscriptionPackage>,
}

/// Insert payload for `user_subscriptions`
#[derive(Debug, Clone, Serialize)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub package_id: Uuid,
    pub credits_remaining: u32,
    pub is_active: bool,
}

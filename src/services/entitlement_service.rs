use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::gateway::models::{UserSubscription, SUBSCRIPTION_PACKAGES, USER_SUBSCRIPTIONS};
use crate::gateway::{BackendGateway, GatewayError, Table};
use crate::session::NormalizedEntitlement;

const SUBSCRIPTION_COLUMNS: [&str; 6] = ["id", "user_id", "package_id", "credits_remaining", "is_active", "created_at"];
const PACKAGE_COLUMNS: [&str; 4] = ["id", "name", "is_premium", "features"];

/// Derives a user's entitlement from their active subscription joined with its package
#[derive(Clone)]
pub struct EntitlementResolver {
    gateway: Arc<dyn BackendGateway>,
}

impl EntitlementResolver {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }

    /// Strict lookup: backend failures are returned, no active subscription is `Ok(None)`.
    pub async fn fetch(&self, user_id: Uuid) -> Result<Option<NormalizedEntitlement>, GatewayError> {
        let subscriptions: Table<UserSubscription> = Table::new(USER_SUBSCRIPTIONS, self.gateway.clone());
        let filter = subscriptions
            .query()?
            .select(SUBSCRIPTION_COLUMNS)?
            .embed(SUBSCRIPTION_PACKAGES, "package_id", &PACKAGE_COLUMNS)?
            .where_clause(json!({ "user_id": user_id, "is_active": true }))?
            .order("created_at desc")?;

        let rows = subscriptions.select_any(filter).await?;
        debug!(%user_id, active = rows.len(), "active subscriptions");

        // Ties on created_at fall back to the row id so the pick never depends on backend order
        let Some(latest) = rows.into_iter().max_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id))) else {
            return Ok(None);
        };

        let subscription_id = latest.id;
        let entitlement = NormalizedEntitlement::from_subscription(latest);
        if entitlement.is_none() {
            warn!(%user_id, %subscription_id, "subscription has no package, ignoring");
        }
        Ok(entitlement)
    }

    /// Lenient lookup used for enrichment: any failure is logged and reads as no entitlement.
    pub async fn resolve(&self, user_id: Uuid) -> Option<NormalizedEntitlement> {
        match self.fetch(user_id).await {
            Ok(entitlement) => entitlement,
            Err(e) => {
                warn!(%user_id, error = %e, "entitlement lookup failed");
                None
            }
        }
    }
}

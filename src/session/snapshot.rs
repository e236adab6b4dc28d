use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gateway::models::{ProfileRow, UserSubscription};
use crate::gateway::{AuthSession, AuthUser};

/// What a user is allowed to use, derived from their active subscription and its package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntitlement {
    pub package_id: Uuid,
    pub package_name: String,
    pub is_premium: bool,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    pub credits_remaining: u32,
}

impl NormalizedEntitlement {
    /// `None` when the package join is missing, which makes the row unusable
    pub fn from_subscription(subscription: UserSubscription) -> Option<Self> {
        let package = subscription.package?;
        Some(Self {
            package_id: subscription.package_id,
            package_name: package.name,
            is_premium: package.is_premium,
            features: package.features.unwrap_or_default(),
            credits_remaining: subscription.credits_remaining,
        })
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

impl UserProfile {
    /// Merges the auth identity with its profile row; a missing row leaves only identity fields
    pub fn from_parts(user: &AuthUser, row: Option<&ProfileRow>) -> Self {
        let mut profile = Self {
            id: user.id,
            email: user.email.clone().unwrap_or_default(),
            ..Default::default()
        };
        if let Some(row) = row {
            profile.name = row.name.clone().unwrap_or_default();
            profile.age = row.age;
            profile.instruction_category = row.instruction_category.clone();
            profile.instruction_option = row.instruction_option.clone();
            profile.region = row.region.clone();
            profile.province = row.province.clone();
        }
        profile
    }
}

/// Provider tokens kept with the snapshot so a later process can end the remote session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl From<&AuthSession> for SessionTokens {
    fn from(session: &AuthSession) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at,
        }
    }
}

/// Who is logged in and what they are entitled to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub profile: UserProfile,
    #[serde(default)]
    pub entitlement: Option<NormalizedEntitlement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<SessionTokens>,
}

impl SessionSnapshot {
    pub fn new(profile: UserProfile, entitlement: Option<NormalizedEntitlement>) -> Self {
        Self { profile, entitlement, tokens: None }
    }

    pub fn with_tokens(mut self, tokens: SessionTokens) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.entitlement.as_ref().is_some_and(|e| e.has_feature(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::models::SubscriptionPackage;
    use chrono::Utc;

    fn subscription(package: Option<SubscriptionPackage>) -> UserSubscription {
        UserSubscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            package_id: Uuid::new_v4(),
            credits_remaining: 3,
            is_active: true,
            created_at: Utc::now(),
            package,
        }
    }

    #[test]
    fn normalizes_subscription_with_package() {
        let sub = subscription(Some(SubscriptionPackage {
            id: Uuid::new_v4(),
            name: "Premium".to_string(),
            is_premium: true,
            features: None,
        }));
        let package_id = sub.package_id;
        let entitlement = NormalizedEntitlement::from_subscription(sub).unwrap();
        assert_eq!(entitlement.package_id, package_id);
        assert_eq!(entitlement.package_name, "Premium");
        assert!(entitlement.is_premium);
        assert!(entitlement.features.is_empty());
        assert_eq!(entitlement.credits_remaining, 3);
    }

    #[test]
    fn missing_package_join_yields_none() {
        assert!(NormalizedEntitlement::from_subscription(subscription(None)).is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let entitlement = NormalizedEntitlement {
            package_id: Uuid::nil(),
            package_name: "Freemium".to_string(),
            is_premium: false,
            features: BTreeMap::from([("sds_test".to_string(), true)]),
            credits_remaining: 0,
        };
        let value = serde_json::to_value(&entitlement).unwrap();
        assert_eq!(value["packageName"], "Freemium");
        assert_eq!(value["isPremium"], false);
        assert_eq!(value["creditsRemaining"], 0);
        assert_eq!(value["features"]["sds_test"], true);
    }

    #[test]
    fn profile_falls_back_to_identity_fields() {
        let user = AuthUser { id: Uuid::new_v4(), email: Some("ana@example.com".to_string()) };
        let profile = UserProfile::from_parts(&user, None);
        assert_eq!(profile.name, "");
        assert_eq!(profile.email, "ana@example.com");
        assert_eq!(profile.id, user.id);
    }
}

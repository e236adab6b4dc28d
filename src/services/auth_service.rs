use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::entitlement_service::EntitlementResolver;
use crate::gateway::models::{
    NewSubscription, ProfileRow, SubscriptionPackage, UserSubscription, SUBSCRIPTION_PACKAGES, USERS_PROFILE,
    USER_SUBSCRIPTIONS,
};
use crate::gateway::{AuthSession, AuthUser, BackendGateway, GatewayError, Table};
use crate::onboarding::RegisterRequest;
use crate::session::{NormalizedEntitlement, SessionSnapshot, SessionTokens, UserProfile};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{message}")]
    InvalidRegistration {
        message: String,
        field_errors: HashMap<String, String>,
    },

    /// Registration was rejected by the provider; carries its message
    #[error("{0}")]
    Registration(String),

    #[error(transparent)]
    Backend(#[from] GatewayError),
}

/// Everything a successful login produced
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: AuthUser,
    pub session: AuthSession,
    /// Raw profile row, absent when the lookup failed or found nothing
    pub profile_row: Option<ProfileRow>,
    pub profile: UserProfile,
    pub entitlement: Option<NormalizedEntitlement>,
}

impl LoginOutcome {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.profile.clone(), self.entitlement.clone())
            .with_tokens(SessionTokens::from(&self.session))
    }
}

/// Login, registration and logout against the provider
#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn BackendGateway>,
    resolver: EntitlementResolver,
    default_package_name: String,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn BackendGateway>, default_package_name: impl Into<String>) -> Self {
        Self {
            resolver: EntitlementResolver::new(gateway.clone()),
            gateway,
            default_package_name: default_package_name.into(),
        }
    }

    pub fn resolver(&self) -> &EntitlementResolver {
        &self.resolver
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let session = match self.gateway.sign_in_with_password(email, password).await {
            Ok(session) => session,
            Err(GatewayError::Unauthorized(reason)) => {
                info!(reason = %reason, "login rejected");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };
        let user = session.user.clone().ok_or(AuthError::InvalidCredentials)?;

        let profile_row = self.fetch_profile(user.id).await;
        let profile = UserProfile::from_parts(&user, profile_row.as_ref());
        let entitlement = self.resolver.resolve(user.id).await;

        info!(user_id = %user.id, premium = entitlement.as_ref().is_some_and(|e| e.is_premium), "user logged in");
        Ok(LoginOutcome { user, session, profile_row, profile, entitlement })
    }

    /// Profile enrichment never fails a login
    async fn fetch_profile(&self, user_id: Uuid) -> Option<ProfileRow> {
        match self.query_profile(user_id).await {
            Ok(row) => row,
            Err(e) => {
                warn!(%user_id, error = %e, "profile lookup failed, continuing without profile");
                None
            }
        }
    }

    async fn query_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, GatewayError> {
        let profiles: Table<ProfileRow> = Table::new(USERS_PROFILE, self.gateway.clone());
        let filter = profiles.query()?.where_clause(json!({ "id": user_id }))?;
        profiles.select_one(filter).await
    }

    /// Creates the auth identity, its profile row and the default subscription
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthUser, AuthError> {
        let answers = request.validate().map_err(|failure| AuthError::InvalidRegistration {
            message: failure.message().to_string(),
            field_errors: failure.field_errors,
        })?;
        let email = request.email.trim();

        let user = self
            .gateway
            .create_user(email, &request.password)
            .await
            .map_err(|e| AuthError::Registration(e.user_message()))?;

        let profiles: Table<ProfileRow> = Table::new(USERS_PROFILE, self.gateway.clone());
        profiles
            .insert(&answers.to_row(user.id))
            .await
            .map_err(|e| AuthError::Registration(e.user_message()))?;

        if let Err(e) = self.assign_default_package(user.id).await {
            warn!(user_id = %user.id, package = %self.default_package_name, error = %e, "default package not assigned");
        }

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn assign_default_package(&self, user_id: Uuid) -> Result<UserSubscription, GatewayError> {
        let packages: Table<SubscriptionPackage> = Table::new(SUBSCRIPTION_PACKAGES, self.gateway.clone());
        let filter = packages
            .query()?
            .where_clause(json!({ "name": self.default_package_name }))?;
        let package = packages.select_404(filter).await?;

        let subscriptions: Table<UserSubscription> = Table::new(USER_SUBSCRIPTIONS, self.gateway.clone());
        subscriptions
            .insert(&NewSubscription {
                user_id,
                package_id: package.id,
                credits_remaining: 0,
                is_active: true,
            })
            .await
    }

    /// Ends the provider session if a token is known; failures are only logged
    pub async fn logout(&self, access_token: Option<&str>) {
        let Some(token) = access_token.filter(|t| !t.is_empty()) else {
            return;
        };
        if let Err(e) = self.gateway.sign_out(token).await {
            warn!(error = %e, "remote sign-out failed");
        }
    }

    pub async fn health(&self) -> Result<(), GatewayError> {
        self.gateway.health_check().await
    }
}

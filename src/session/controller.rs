use tracing::info;

use super::snapshot::{SessionSnapshot, UserProfile};
use super::store::SessionStore;
use crate::gateway::AuthUser;
use crate::onboarding::{OnboardingProfile, RegisterRequest};
use crate::services::{AuthError, AuthService, LoginOutcome};

/// Client-side driver of login, logout and registration. The only writer of
/// its [`SessionStore`]; setting and deleting gate cookies is left to the caller.
#[derive(Clone)]
pub struct AuthSessionController {
    auth: AuthService,
    store: SessionStore,
}

impl AuthSessionController {
    pub fn new(auth: AuthService, store: SessionStore) -> Self {
        Self { auth, store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Restores the cached session on client start
    pub async fn init(&self) {
        self.store.rehydrate(self.auth.resolver()).await;
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let _loading = self.store.begin_loading();
        let outcome = self.auth.login(email, password).await?;
        self.store.write(outcome.snapshot()).await;
        Ok(outcome)
    }

    pub async fn logout(&self) {
        let token = self
            .store
            .snapshot()
            .await
            .and_then(|snapshot| snapshot.tokens)
            .map(|tokens| tokens.access_token);
        self.auth.logout(token.as_deref()).await;
        self.store.clear().await;
        info!("session cleared");
    }

    pub async fn register_with_onboarding(&self, request: &RegisterRequest) -> Result<AuthUser, AuthError> {
        self.auth.register(request).await
    }

    /// Builds the first snapshot of a freshly registered user from their answers
    pub async fn seed_session(&self, user: &AuthUser, answers: &OnboardingProfile) -> SessionSnapshot {
        let profile = UserProfile {
            id: user.id,
            email: user.email.clone().unwrap_or_default(),
            name: answers.name.clone(),
            age: Some(answers.age),
            instruction_category: Some(answers.instruction_category.clone()),
            instruction_option: answers.instruction_option.clone(),
            region: Some(answers.region.clone()),
            province: Some(answers.province.clone()),
        };
        let snapshot = SessionSnapshot::new(profile, self.auth.resolver().resolve(user.id).await);
        self.store.write(snapshot.clone()).await;
        snapshot
    }

    pub async fn has_feature(&self, name: &str) -> bool {
        self.store.has_feature(name).await
    }
}

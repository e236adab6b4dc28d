use std::sync::Arc;

use crate::config::{AppConfig, CookieConfig};
use crate::gateway::BackendGateway;
use crate::services::{AuthService, EntitlementResolver};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub entitlements: EntitlementResolver,
    pub cookies: CookieConfig,
}

impl AppState {
    pub fn new(gateway: Arc<dyn BackendGateway>, config: &AppConfig) -> Self {
        let auth = AuthService::new(gateway, config.backend.default_package_name.clone());
        Self {
            entitlements: auth.resolver().clone(),
            auth,
            cookies: config.cookies.clone(),
        }
    }
}

pub mod auth_service;
pub mod entitlement_service;

pub use auth_service::{AuthError, AuthService, LoginOutcome};
pub use entitlement_service::EntitlementResolver;

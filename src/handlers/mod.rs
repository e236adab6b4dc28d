// handlers/mod.rs - one module per route group, one file per handler
//
// /api/auth/*        credentials, registration, subscription lookup
// /api/onboarding/*  wizard completion and catalog
// /api/health        provider reachability

pub mod auth;
pub mod health;
pub mod onboarding;

pub use health::health_get;

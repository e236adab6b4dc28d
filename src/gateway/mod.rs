//! Remote backend gateway: the hosted auth/database provider seen as an opaque
//! service offering credential sessions and row-level table access.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::filter::{Filter, FilterError};

pub mod models;
pub mod repository;
pub mod rest;

pub use models::{AuthSession, AuthUser};
pub use repository::Table;
pub use rest::RestGateway;

/// Errors from the remote backend
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid backend URL")]
    InvalidUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider rejected the credentials or token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Backend responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed backend payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl GatewayError {
    /// Message suitable for showing to the user as-is
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Unauthorized(msg) | GatewayError::NotFound(msg) => msg.clone(),
            GatewayError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Exchange email + password for a provider session
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError>;

    /// Create a confirmed auth identity (privileged)
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, GatewayError>;

    /// Terminate the provider session owning `access_token`
    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError>;

    async fn select(&self, filter: &Filter) -> Result<Vec<Value>, GatewayError>;

    /// Insert one row and return the stored representation
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, GatewayError>;

    async fn health_check(&self) -> Result<(), GatewayError>;
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::models::{AuthSession, AuthUser};
use super::{BackendGateway, GatewayError};
use crate::config::BackendConfig;
use crate::filter::Filter;

/// HTTP client for the hosted provider's auth (`/auth/v1`) and REST (`/rest/v1`) APIs
pub struct RestGateway {
    client: reqwest::Client,
    base_url: Url,
    anon_key: String,
    service_role_key: String,
}

impl RestGateway {
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        if config.url.trim().is_empty() {
            return Err(GatewayError::ConfigMissing("SUPABASE_URL"));
        }

        let mut base_url = Url::parse(&config.url).map_err(|_| GatewayError::InvalidUrl)?;
        // Relative joins below need the base path to end with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url.join(path).map_err(|_| GatewayError::InvalidUrl)
    }

    /// Table access and admin calls use the privileged key when one is configured
    fn privileged_key(&self) -> &str {
        if self.service_role_key.is_empty() {
            &self.anon_key
        } else {
            &self.service_role_key
        }
    }

    fn public_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.anon_key)
    }

    fn privileged_request(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.privileged_key();
        request.header("apikey", key).bearer_auth(key)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Builds an error from a non-success response, keeping the provider's message
    async fn error_from_response(response: Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body).unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("Backend request failed").to_string()
        });

        match status {
            StatusCode::NOT_FOUND => GatewayError::NotFound(message),
            _ => GatewayError::Status { status: status.as_u16(), message },
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl BackendGateway for RestGateway {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let url = self.endpoint("auth/v1/token")?;
        let response = self
            .public_request(self.client.post(url))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Self::decode(response).await;
        }
        match Self::error_from_response(response).await {
            // Wrong credentials come back as 400 from the token endpoint
            GatewayError::Status { status, message } if (400..500).contains(&status) => {
                Err(GatewayError::Unauthorized(message))
            }
            other => Err(other),
        }
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, GatewayError> {
        let url = self.endpoint("auth/v1/admin/users")?;
        let response = self
            .privileged_request(self.client.post(url))
            .json(&json!({ "email": email, "password": password, "email_confirm": true }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Self::decode(response).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError> {
        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .public_request(self.client.post(url))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Value>, GatewayError> {
        let url = self.endpoint(&format!("rest/v1/{}", filter.table_name()))?;
        let params = filter.to_query_params();
        debug!(table = filter.table_name(), ?params, "select");

        let response = self
            .privileged_request(self.client.get(url))
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Self::decode(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, GatewayError> {
        // Validates the table name the same way queries do
        let filter = Filter::new(table)?;
        let url = self.endpoint(&format!("rest/v1/{}", filter.table_name()))?;
        debug!(table, "insert");

        let response = self
            .privileged_request(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Self::decode(response).await
    }

    async fn health_check(&self) -> Result<(), GatewayError> {
        let url = self.endpoint("auth/v1/health")?;
        let response = self.public_request(self.client.get(url)).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}

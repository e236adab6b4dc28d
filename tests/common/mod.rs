#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use onboarding_api::config::AppConfig;
use onboarding_api::gateway::RestGateway;
use onboarding_api::{app, AppState};

pub const INDEX_HTML: &str = "<html><body>onboarding app</body></html>";

/// Router wired to a mock provider, with a temporary static page directory
pub struct TestApp {
    pub backend: MockServer,
    pub router: Router,
    _pages: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect()
    }

    pub fn sets_cookie(&self, name: &str) -> bool {
        self.set_cookies().iter().any(|c| c.starts_with(&format!("{}=true", name)))
    }

    pub fn clears_cookie(&self, name: &str) -> bool {
        self.set_cookies()
            .iter()
            .any(|c| c.starts_with(&format!("{}=", name)) && c.contains("Max-Age=0"))
    }
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let backend = MockServer::start().await;
        let pages = tempfile::tempdir()?;
        std::fs::write(pages.path().join("index.html"), INDEX_HTML)?;
        std::fs::write(pages.path().join("logo.svg"), "<svg/>")?;

        let mut config = AppConfig::development();
        config.backend.url = backend.uri();
        config.backend.anon_key = "anon-key".to_string();
        config.backend.service_role_key = "service-key".to_string();
        config.server.static_dir = pages.path().to_string_lossy().into_owned();
        config.server.enable_request_logging = false;

        let gateway = Arc::new(RestGateway::new(&config.backend)?);
        let router = app(AppState::new(gateway, &config), &config);

        Ok(Self { backend, router, _pages: pages })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await?.to_vec();
        Ok(TestResponse { status, headers, body })
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.send(Request::builder().uri(uri).body(Body::empty())?).await
    }

    pub async fn get_with_cookies(&self, uri: &str, cookies: &str) -> Result<TestResponse> {
        let request = Request::builder().uri(uri).header(header::COOKIE, cookies).body(Body::empty())?;
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(request).await
    }
}

pub fn auth_session_body(user_id: Uuid, email: &str) -> Value {
    json!({
        "access_token": "provider-access-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000,
        "refresh_token": "provider-refresh-token",
        "user": { "id": user_id, "email": email, "aud": "authenticated" }
    })
}

pub async fn mock_sign_in(backend: &MockServer, user_id: Uuid, email: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_session_body(user_id, email)))
        .mount(backend)
        .await;
}

pub async fn mock_table(backend: &MockServer, table: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", table)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(backend)
        .await;
}

pub fn subscription_row(user_id: Uuid, package_name: &str, created_at: &str, features: Value) -> Value {
    let package_id = Uuid::new_v4();
    json!({
        "id": Uuid::new_v4(),
        "user_id": user_id,
        "package_id": package_id,
        "credits_remaining": 12,
        "is_active": true,
        "created_at": created_at,
        "subscription_packages": {
            "id": package_id,
            "name": package_name,
            "is_premium": package_name != "Freemium",
            "features": features
        }
    })
}

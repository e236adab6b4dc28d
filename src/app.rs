use std::path::Path;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers;
use crate::middleware::route_gate_middleware;
use crate::state::AppState;

/// Full application router: the API plus the gated frontend pages
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let static_dir = Path::new(&config.server.static_dir);
    let pages = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let router = Router::new()
        .merge(auth_routes())
        .merge(onboarding_routes())
        .route("/api/health", get(handlers::health_get))
        .fallback_service(pages)
        // Gate runs before any page is served
        .layer(middleware::from_fn(route_gate_middleware))
        .layer(cors_layer(&config.security));

    let router = if config.server.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/logout", get(auth::logout_get))
        .route("/api/auth/subscription", get(auth::subscription_get))
}

fn onboarding_routes() -> Router<AppState> {
    use handlers::onboarding;

    Router::new()
        .route("/api/onboarding/complete", post(onboarding::complete_post))
        .route("/api/onboarding/options", get(onboarding::options_get))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if crate::is_development!() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

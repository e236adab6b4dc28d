use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub cookies: CookieConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Built frontend pages served behind the route gate
    pub static_dir: String,
    pub enable_request_logging: bool,
}

/// Connection settings for the hosted auth/database provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
    pub request_timeout_secs: u64,
    /// Package assigned to every new account
    pub default_package_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    pub onboarding_max_age_secs: i64,
    pub login_max_age_secs: i64,
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("ONBOARDING_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            self.server.static_dir = v;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Backend overrides
        if let Ok(v) = env::var("SUPABASE_URL") {
            self.backend.url = v;
        }
        if let Ok(v) = env::var("SUPABASE_ANON_KEY") {
            self.backend.anon_key = v;
        }
        if let Ok(v) = env::var("SUPABASE_SERVICE_ROLE_KEY") {
            self.backend.service_role_key = v;
        }
        if let Ok(v) = env::var("BACKEND_TIMEOUT_SECS") {
            self.backend.request_timeout_secs = v.parse().unwrap_or(self.backend.request_timeout_secs);
        }
        if let Ok(v) = env::var("DEFAULT_PACKAGE_NAME") {
            self.backend.default_package_name = v;
        }

        // Cookie overrides
        if let Ok(v) = env::var("COOKIE_ONBOARDING_MAX_AGE_SECS") {
            self.cookies.onboarding_max_age_secs = v.parse().unwrap_or(self.cookies.onboarding_max_age_secs);
        }
        if let Ok(v) = env::var("COOKIE_LOGIN_MAX_AGE_SECS") {
            self.cookies.login_max_age_secs = v.parse().unwrap_or(self.cookies.login_max_age_secs);
        }
        if let Ok(v) = env::var("COOKIE_SECURE") {
            self.cookies.secure = v.parse().unwrap_or(self.cookies.secure);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                static_dir: "public".to_string(),
                enable_request_logging: true,
            },
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                service_role_key: String::new(),
                request_timeout_secs: 10,
                default_package_name: "Freemium".to_string(),
            },
            cookies: CookieConfig {
                onboarding_max_age_secs: 60 * 60 * 24 * 365, // 1 year
                login_max_age_secs: 60 * 60 * 24 * 5,         // 5 days
                secure: false,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                static_dir: "public".to_string(),
                enable_request_logging: true,
            },
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                service_role_key: String::new(),
                request_timeout_secs: 8,
                default_package_name: "Freemium".to_string(),
            },
            cookies: CookieConfig {
                onboarding_max_age_secs: 60 * 60 * 24 * 365,
                login_max_age_secs: 60 * 60 * 24 * 5,
                secure: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                static_dir: "public".to_string(),
                enable_request_logging: false,
            },
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                service_role_key: String::new(),
                request_timeout_secs: 5,
                default_package_name: "Freemium".to_string(),
            },
            cookies: CookieConfig {
                onboarding_max_age_secs: 60 * 60 * 24 * 365,
                login_max_age_secs: 60 * 60 * 24 * 5,
                secure: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

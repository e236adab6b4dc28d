use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::config;
use crate::gateway::RestGateway;
use crate::services::AuthService;
use crate::session::{AuthSessionController, FileSessionCache, SessionStore};

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("ONBOARD_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("onboard").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Controller over the provider configured in the environment, with the
/// session cached under the CLI config directory. Not yet rehydrated.
pub fn session_controller() -> anyhow::Result<AuthSessionController> {
    let settings = config();
    let gateway = Arc::new(RestGateway::new(&settings.backend)?);
    let auth = AuthService::new(gateway, settings.backend.default_package_name.clone());
    let store = SessionStore::new(Arc::new(FileSessionCache::new(get_config_dir()?)));
    Ok(AuthSessionController::new(auth, store))
}

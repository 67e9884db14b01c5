use std::sync::Arc;

use greenlight_dal::Pool;
use greenlight_types::config::Environment;

/// Shared handler context, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { pool, app_config }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            environment: Environment::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

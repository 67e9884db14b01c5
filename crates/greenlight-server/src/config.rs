use greenlight_app::state::AppConfig;
use greenlight_types::config::{DatabaseConfig, Environment};
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
pub use clap::Parser;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 4000,
        env = "GREENLIGHT_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,

    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "GREENLIGHT_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        value_enum,
        default_value_t = Environment::Development,
        env = "GREENLIGHT_ENV",
        help = "Environment name reported by the healthcheck"
    )]
    pub env: Environment,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[arg(long, env = "GREENLIGHT_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,

    #[arg(
        long,
        env = "GREENLIGHT_READ_TIMEOUT",
        default_value = "5s",
        help = "Maximum time to receive a request body",
        value_parser = humantime::parse_duration
    )]
    pub read_timeout: Duration,

    #[arg(
        long,
        env = "GREENLIGHT_REQUEST_TIMEOUT",
        default_value = "10s",
        help = "Maximum time to handle a request, answered with 408 when exceeded",
        value_parser = humantime::parse_duration
    )]
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Parses command line, falling back to environment variables.
    ///
    /// A `.env` file in the working directory, if present, is loaded first.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }
        ServerConfig::try_parse().map_err(|e| e.into())
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            environment: config.env,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["greenlight-server"]).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.listen_address, "127.0.0.1");
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.database.database_url, "sqlite://greenlight.db");
        assert_eq!(config.database.db_connect_timeout, Duration::from_secs(5));
        assert!(!config.no_cors);
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_timeouts() {
        let config = ServerConfig::try_parse_from([
            "greenlight-server",
            "--read-timeout",
            "1s 500ms",
            "--request-timeout",
            "1m",
        ])
        .unwrap();
        assert_eq!(config.read_timeout, Duration::from_millis(1500));
        assert_eq!(config.request_timeout, Duration::from_secs(60));

        let res = ServerConfig::try_parse_from(["greenlight-server", "--request-timeout", "soon"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_app_config() {
        let config = ServerConfig::try_parse_from([
            "greenlight-server",
            "--port",
            "8080",
            "--env",
            "production",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        let app_config: AppConfig = (&config).into();
        assert_eq!(app_config.environment, Environment::Production);
        assert_eq!(app_config.version, env!("CARGO_PKG_VERSION"));
    }
}

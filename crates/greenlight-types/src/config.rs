use std::{fmt::Display, time::Duration};

use clap::{Args, ValueEnum};
use serde::Serialize;

#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    #[arg(
        long,
        env = "GREENLIGHT_DATABASE_URL",
        default_value = "sqlite://greenlight.db",
        help = "Database URL e.g. sqlite://file.db or sqlite::memory:"
    )]
    pub database_url: String,

    #[arg(
        long,
        env = "GREENLIGHT_DB_MAX_CONNECTIONS",
        default_value_t = 25,
        help = "Maximum number of pooled database connections"
    )]
    pub db_max_connections: u32,

    #[arg(
        long,
        env = "GREENLIGHT_DB_CONNECT_TIMEOUT",
        default_value = "5s",
        help = "How long to wait for the database on startup (e.g. 5s, 1m)",
        value_parser = humantime::parse_duration
    )]
    pub db_connect_timeout: Duration,

    #[arg(
        long,
        env = "GREENLIGHT_DB_IDLE_TIMEOUT",
        default_value = "15m",
        help = "Idle connections are closed after this time",
        value_parser = humantime::parse_duration
    )]
    pub db_idle_timeout: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

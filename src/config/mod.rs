use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_minutes: i64,
}

/// Process-wide settings, loaded once at startup and never mutated.
///
/// `RUN_MODE` selects the environment (dev/test/prod) and its defaults;
/// optional `config/<mode>` files and `APP_*` environment variables
/// override them.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "dev".into());
        Self::with_run_mode(&run_mode)
    }

    /// Test defaults: in-memory SQLite on a single connection so every
    /// test run starts from an empty store.
    pub fn new_for_test() -> Result<Self, ConfigError> {
        Self::with_run_mode("test")
    }

    fn with_run_mode(run_mode: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("environment", run_mode)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("database.url", "sqlite://microblog.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_secret", "development_secret")?
            .set_default("auth.token_expiry_minutes", 30)?;

        if run_mode == "test" {
            builder = builder
                .set_default("database.url", "sqlite::memory:")?
                .set_default("database.max_connections", 1)?
                .set_default("auth.jwt_secret", "test_secret")?;
        }

        builder
            // Settings from config files, if present
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables with prefix "APP_",
            // e.g. `APP_SERVER__PORT=5001` sets `Settings.server.port`
            .add_source(
                Environment::with_prefix("app")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

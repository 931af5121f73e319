use std::env;
use std::path::PathBuf;

/// Runtime settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub log_level: String,
    pub max_connections: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DB_MAX_CONNECTIONS must be a positive integer, got '{0}'")]
    InvalidMaxConnections(String),
    #[error("DATABASE_URL must be set to a production Postgres instance")]
    MissingDatabaseUrl,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let catalog_path = env::var("CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidMaxConnections(raw))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            catalog_path,
            log_level,
            max_connections,
        })
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Users and follow edges in Postgres.
    #[default]
    Postgres,
    /// Users in Postgres, follow edges in Redis sorted sets.
    Redis,
    /// Everything in process memory, lost on restart.
    Memory,
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    pub environment: Option<String>,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub port: Option<u16>,
    pub storage_backend: Option<StorageBackend>,
    pub run_migrations: Option<bool>,
}

impl Settings {
    pub fn is_production(&self) -> bool {
        self.environment.as_deref() == Some("PROD")
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend.unwrap_or_default()
    }
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let settings = Config::builder();
    let settings = settings.add_source(Environment::default());
    settings.build()?.try_deserialize()
}

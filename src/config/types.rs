//! Configuration types.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// HTTP server and storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on (default: 5000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Single browser origin allowed to call the API with credentials.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("todo-tree/todo.db")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Login session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in days (default: 10).
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
        }
    }
}

fn default_ttl_days() -> i64 {
    10
}

/// Longest accepted session lifetime, in days.
pub const MAX_TTL_DAYS: i64 = 3650;

impl SessionConfig {
    /// Reject lifetimes that would mint already-expired or unrepresentable sessions.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_TTL_DAYS).contains(&self.ttl_days),
            "session.ttl_days must be between 1 and {}, got {}",
            MAX_TTL_DAYS,
            self.ttl_days
        );
        Ok(())
    }

    /// Session lifetime, clamped to the range `validate` accepts.
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.ttl_days.clamp(1, MAX_TTL_DAYS))
            .unwrap_or_else(|| chrono::Duration::days(default_ttl_days()))
    }
}

impl Config {
    /// Load configuration from a single file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

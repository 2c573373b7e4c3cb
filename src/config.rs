//! TOML configuration with environment overrides.
//!
//! ```toml
//! [db]
//! path = "./data/contacts.sqlite"
//! max_connections = 5
//!
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! ```
//!
//! Every key is optional. After the file is read, `PORT` and
//! `CONTACTS_DB_PATH` (from the process environment or a `.env` file)
//! override `server.port` and `db.path`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/contacts.sqlite")
}
fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config> {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let mut config: Config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Config::default()
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

fn apply_env(config: &mut Config, var: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(port) = var("PORT").filter(|v| !v.trim().is_empty()) {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?;
    }
    if let Some(path) = var("CONTACTS_DB_PATH").filter(|v| !v.trim().is_empty()) {
        config.db.path = PathBuf::from(path);
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    if config.db.max_connections == 0 {
        anyhow::bail!("db.max_connections must be > 0");
    }
    if config.server.host.trim().is_empty() {
        anyhow::bail!("server.host must not be empty");
    }
    Ok(())
}

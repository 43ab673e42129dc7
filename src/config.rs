use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Base URL prepended to object keys when issuing public URLs.
    /// Falls back to the virtual-hosted S3 URL for the bucket/region.
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (usually port 465) when true, STARTTLS otherwise.
    #[serde(default)]
    pub secure: bool,
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allow-origin for the contact form frontend.
    pub frontend_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
            frontend_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub path: String,
    /// Max size per log file in MiB before rolling.
    pub size: u64,
    pub max_files: usize,
}

fn default_max_connections() -> u32 {
    10
}

fn default_port() -> u16 {
    3001
}

pub fn load_config(path: &str) -> Result<Config> {
    let config_text = fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let mut config: Config = toml::from_str(&config_text)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Environment variables recognized by the mail relay deployment.
/// They take precedence over the config file.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(host) = std::env::var("SMTP_HOST") {
        config.smtp.host = host;
    }
    if let Ok(port) = std::env::var("SMTP_PORT") {
        if let Ok(port) = port.parse() {
            config.smtp.port = port;
        }
    }
    if let Ok(secure) = std::env::var("SMTP_SECURE") {
        config.smtp.secure = secure.eq_ignore_ascii_case("true");
    }
    if let Ok(user) = std::env::var("SMTP_USER") {
        config.smtp.user = user;
    }
    if let Ok(pass) = std::env::var("SMTP_PASS") {
        config.smtp.pass = pass;
    }
    if let Ok(url) = std::env::var("FRONTEND_URL") {
        config.server.frontend_url = Some(url);
    }
    if let Ok(port) = std::env::var("PORT") {
        if let Ok(port) = port.parse() {
            config.server.port = port;
        }
    }
}

//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Datastore configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "postgres://localhost:5432/gallery".to_string()
}

fn default_max_connections() -> u32 {
    5
}

/// External image-provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_provider_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "dall-e-2".to_string()
}

fn default_image_size() -> String {
    "512x512".to_string()
}

fn default_timeout() -> u64 {
    60000
}

/// Generation cooldown configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

fn default_cooldown_secs() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", default_database_url())?
            .set_default("database.max_connections", 5)?
            .set_default("provider.base_url", default_provider_base_url())?
            .set_default("provider.api_key", "")?
            .set_default("provider.model", default_model())?
            .set_default("provider.image_size", default_image_size())?
            .set_default("provider.timeout_ms", 60000)?
            .set_default("generation.cooldown_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            // Load from configuration file
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with GALLERY__)
            .add_source(
                Environment::with_prefix("GALLERY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.database.url.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Database URL cannot be empty".to_string(),
            )));
        }

        if self.provider.base_url.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Provider base URL cannot be empty".to_string(),
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            database: DatabaseConfig {
                url: default_database_url(),
                max_connections: default_max_connections(),
            },
            provider: ProviderConfig {
                base_url: default_provider_base_url(),
                api_key: String::new(),
                model: default_model(),
                image_size: default_image_size(),
                timeout_ms: default_timeout(),
            },
            generation: GenerationConfig {
                cooldown_secs: default_cooldown_secs(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.provider.model, "dall-e-2");
        assert_eq!(settings.provider.image_size, "512x512");
        assert_eq!(settings.generation.cooldown_secs, 30);
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_provider_url() {
        let mut settings = Settings::default();
        settings.provider.base_url = String::new();
        assert!(settings.validate().is_err());
    }
}

//! Configuration module

pub mod settings;

pub use settings::{
    DatabaseConfig, GenerationConfig, LoggingConfig, ProviderConfig, ServerConfig, Settings,
};

use config::{Config, ConfigError, Environment, File};
use lease_quote_core::EngineConfig;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub engine: EngineConfig,
    pub offer_service: OfferServiceSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Origins allowed to call the API from a browser; empty allows any
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OfferServiceSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("application.environment", environment.clone())?
            .set_default("offer_service.base_url", "http://localhost:8090")?
            .set_default("offer_service.timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("LEASE_QUOTE").separator("__"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings
            .engine
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}

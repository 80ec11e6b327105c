//! Server Configuration

use serde::Deserialize;

/// Rate limiting knobs (GCRA parameters)
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Seconds per replenished request
    #[serde(default = "default_per_second")]
    pub per_second: u64,
    /// Requests that may be made immediately
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

fn default_per_second() -> u64 {
    2
}

fn default_burst_size() -> u32 {
    5
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: default_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

/// Server configuration, layered from an optional `grade-pipeline` config
/// file and `GRADE_`-prefixed environment variables
/// (e.g. `GRADE_BIND_ADDR`, `GRADE_RATE_LIMIT__BURST_SIZE`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Directory of model files; built-in models when unset
    #[serde(default)]
    pub models_dir: Option<String>,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite://grade-pipeline.db".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: default_database_url(),
            models_dir: None,
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment sources
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("grade-pipeline").required(false))
            .add_source(config::Environment::with_prefix("GRADE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.models_dir.is_none());
        assert_eq!(config.rate_limit.per_second, 2);
        assert_eq!(config.rate_limit.burst_size, 5);
    }

    #[test]
    fn test_empty_sources_fall_back_to_defaults() {
        let config: ServerConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.database_url, "sqlite://grade-pipeline.db");
    }
}

//! API configuration

use serde::Deserialize;

use fixture_core::FixtureOptions;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Environment name the fixture registration is gated on; falls back to
    /// the `APP_ENV` process variable when unset
    pub environment: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            environment: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads fixture options from `FIXTURES_`-prefixed environment variables,
/// merged over the documented defaults.
pub fn fixture_options_from_env() -> Result<FixtureOptions, config::ConfigError> {
    config::Config::builder()
        .add_source(config::Environment::with_prefix("FIXTURES").try_parsing(true))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_addr_joins_host_and_port() {
        let config = ApiConfig {
            host: "127.0.0.1".into(),
            port: 3000,
            ..ApiConfig::default()
        };
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }
}

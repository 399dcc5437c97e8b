use config::{Config as ConfigCrate, ConfigError};
use serde::Deserialize;
use tokeninfo_auth::TokeninfoConfig;

/// Main configuration structure for the development server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// The port the server will listen to (default: 7780)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tokeninfo endpoint configuration
    #[serde(default)]
    pub tokeninfo: TokeninfoConfig,
}

fn default_port() -> u16 {
    7780
}

impl ServerConfig {
    /// Creates a new Config instance from environment variables.
    ///
    /// Nested keys are separated by a double underscore,
    /// e.g. `DEVSERVER_TOKENINFO__ENDPOINT_URL`.
    pub fn new() -> Result<Self, String> {
        ConfigCrate::builder()
            .add_source(
                config::Environment::with_prefix("DEVSERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }

    #[cfg(test)]
    pub fn for_test_with_mock(tokeninfo_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            tokeninfo: TokeninfoConfig {
                endpoint_url: format!("{}/oauth2/v2/tokeninfo", tokeninfo_mock.uri()),
                timeout_secs: 5,
                connect_timeout_secs: 1,
            },
        }
    }
}

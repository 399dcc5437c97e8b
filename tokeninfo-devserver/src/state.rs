use crate::config::ServerConfig;
use std::sync::Arc;
use tokeninfo_auth::{ConfigError, TokeninfoContextFactory};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub contexts: TokeninfoContextFactory,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: Arc::new(config.clone()),
            contexts: TokeninfoContextFactory::from_config(&config.tokeninfo)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokeninfo_auth::TokeninfoConfig;

    #[test]
    fn test_app_state_new() {
        let config = ServerConfig {
            port: 3000,
            tokeninfo: TokeninfoConfig::with_endpoint("http://localhost:9000/tokeninfo"),
        };
        let state = AppState::new(&config).expect("Failed to create state");
        assert_eq!(state.config.port, 3000);
    }

    #[test]
    fn test_app_state_rejects_invalid_endpoint() {
        let config = ServerConfig {
            port: 3000,
            tokeninfo: TokeninfoConfig::with_endpoint("::not a url::"),
        };
        assert!(matches!(
            AppState::new(&config),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_app_state_clone() {
        let config = ServerConfig {
            port: 3000,
            tokeninfo: TokeninfoConfig::default(),
        };
        let state = AppState::new(&config).unwrap();
        let state2 = state.clone();

        // After cloning, both instances should point to the same data
        assert_eq!(Arc::as_ptr(&state.config), Arc::as_ptr(&state2.config));
    }
}

use serde::Deserialize;

/// Default public tokeninfo endpoint
pub const DEFAULT_TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/tokeninfo";

/// Configuration for the tokeninfo validator
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TokeninfoConfig {
    /// URL of the tokeninfo endpoint (default: Google's OAuth2 v2 tokeninfo)
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Timeout for a whole tokeninfo request in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for establishing a connection in seconds (default: 2)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_endpoint_url() -> String {
    DEFAULT_TOKENINFO_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    2
}

impl Default for TokeninfoConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl TokeninfoConfig {
    /// Config pointing at a custom endpoint, e.g. a fake server in tests
    pub fn with_endpoint(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            ..Default::default()
        }
    }
}

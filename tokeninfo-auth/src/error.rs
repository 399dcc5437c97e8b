use crate::platform::NamespaceError;
use thiserror::Error;

/// Errors produced while validating a bearer token or resolving the caller's identity.
///
/// Every variant is terminal for the call that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to send request to tokeninfo endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode tokeninfo response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Error fetching tokeninfo (status {status}){}", describe(.description))]
    RemoteRejection {
        status: u16,
        description: Option<String>,
    },

    #[error("Token is expired")]
    TokenExpired,

    #[error("Unverified email {0:?}")]
    UnverifiedEmail(String),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("No token found")]
    NoTokenPresent,

    #[error("No scope matches: expected one of {granted:?}, got {requested:?}")]
    ScopeMismatch { granted: String, requested: String },

    #[error("Failed to derive namespaced context: {0}")]
    Namespace(#[from] NamespaceError),

    #[error("Operation cancelled before tokeninfo call completed")]
    Cancelled,
}

fn describe(description: &Option<String>) -> String {
    match description {
        Some(description) => format!(": {description}"),
        None => String::new(),
    }
}

/// Payload-free classification of an [`AuthError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    Transport,
    Decode,
    RemoteRejection,
    TokenExpired,
    UnverifiedEmail,
    InvalidEmail,
    NoTokenPresent,
    ScopeMismatch,
    Namespace,
    Cancelled,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::Transport(_) => AuthErrorKind::Transport,
            AuthError::Decode(_) => AuthErrorKind::Decode,
            AuthError::RemoteRejection { .. } => AuthErrorKind::RemoteRejection,
            AuthError::TokenExpired => AuthErrorKind::TokenExpired,
            AuthError::UnverifiedEmail(_) => AuthErrorKind::UnverifiedEmail,
            AuthError::InvalidEmail => AuthErrorKind::InvalidEmail,
            AuthError::NoTokenPresent => AuthErrorKind::NoTokenPresent,
            AuthError::ScopeMismatch { .. } => AuthErrorKind::ScopeMismatch,
            AuthError::Namespace(_) => AuthErrorKind::Namespace,
            AuthError::Cancelled => AuthErrorKind::Cancelled,
        }
    }
}

/// Errors raised while turning a [`crate::TokeninfoConfig`] into runtime objects
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid tokeninfo endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

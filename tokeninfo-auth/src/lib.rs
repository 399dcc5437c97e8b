//! # tokeninfo-auth
//!
//! Bearer token validation backed by a remote tokeninfo (introspection) endpoint.
//! Intended for development servers, where a locally-verifying validator is overkill.
//!
//! ## Components
//!
//! - **Introspector:** Fetches token metadata from the tokeninfo endpoint and applies
//!   freshness and email verification checks.
//! - **Scope resolver:** Extracts the bearer token from the current request and checks
//!   that the token grants the requested scope.
//! - **Identity context:** Request-scoped handle that answers "who is calling, authorized
//!   for scope S?" without exposing how the token was verified.
//! - **Platform:** The request-scoped execution environment (cancellation, namespacing,
//!   HTTP client, diagnostics) the core is threaded through.

pub mod config;
pub mod context;
pub mod error;
pub mod introspector;
pub mod platform;
pub mod scope;
pub mod token;

pub use crate::config::TokeninfoConfig;
pub use crate::context::{IdentityContext, TokeninfoContext, TokeninfoContextFactory, User};
pub use crate::error::{AuthError, AuthErrorKind, ConfigError};
pub use crate::introspector::{TokenInfo, TokenIntrospector};
pub use crate::platform::{
    DiagnosticSink, LogSink, NamespaceError, Platform, PlatformContext, RequestContext,
};
pub use crate::scope::{has_scope, scoped_token_info};
pub use crate::token::extract_token;

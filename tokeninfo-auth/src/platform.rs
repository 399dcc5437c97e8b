//! Request-scoped execution environment the validator is threaded through.
//!
//! The core only depends on the [`PlatformContext`] trait. [`Platform`] and
//! [`RequestContext`] are the concrete implementation used by servers: a process-wide
//! handle owning the HTTP client and a root cancellation token, and a per-request
//! context derived from it.

use crate::config::TokeninfoConfig;
use crate::error::ConfigError;
use http::request::Parts;
use log::debug;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Longest namespace name the platform accepts
pub const MAX_NAMESPACE_LEN: usize = 100;

/// Fire-and-forget sink for diagnostic messages attributed to a request
pub trait DiagnosticSink: Send + Sync {
    fn debug(&self, label: &str, message: &str);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn debug(&self, label: &str, message: &str) {
        debug!("[{}] {}", label, message);
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("Invalid namespace name {0:?}, expected at most 100 characters of [0-9A-Za-z._-]")]
    InvalidName(String),
}

/// Capabilities the validator needs from the surrounding request environment
pub trait PlatformContext: Send + Sync + 'static {
    /// Namespace this context operates in; empty for the default namespace
    fn namespace(&self) -> &str;

    /// Derives an independent context operating within the given namespace
    fn with_namespace(&self, name: &str) -> Result<Self, NamespaceError>
    where
        Self: Sized;

    /// HTTP client for outbound calls made on behalf of this request
    fn http_client(&self) -> &Client;

    /// Cancelled when the request is abandoned or the process shuts down
    fn cancellation(&self) -> &CancellationToken;

    /// Records a diagnostic message attributed to this request
    fn debug(&self, message: &str);
}

/// Process-wide platform handle, the factory for [`RequestContext`]s
#[derive(Clone)]
pub struct Platform {
    client: Client,
    sink: Arc<dyn DiagnosticSink>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("shutdown", &self.shutdown.is_cancelled())
            // Skip client and sink
            .finish_non_exhaustive()
    }
}

impl Platform {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            sink: Arc::new(LogSink),
            shutdown: CancellationToken::new(),
        }
    }

    /// Builds the platform with an HTTP client honoring the configured timeouts
    pub fn from_config(config: &TokeninfoConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;
        Ok(Self::new(client))
    }

    /// Replaces the diagnostics sink (defaults to [`LogSink`])
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Root token; cancelling it cancels every context derived from this platform
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Creates the platform context for an inbound request
    pub fn context_for(&self, request: &Parts) -> RequestContext {
        RequestContext {
            label: format!("{} {}", request.method, request.uri.path()),
            namespace: String::new(),
            client: self.client.clone(),
            sink: Arc::clone(&self.sink),
            cancellation: self.shutdown.child_token(),
        }
    }
}

/// Platform context of a single inbound request
#[derive(Clone)]
pub struct RequestContext {
    label: String,
    namespace: String,
    client: Client,
    sink: Arc<dyn DiagnosticSink>,
    cancellation: CancellationToken,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("label", &self.label)
            .field("namespace", &self.namespace)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl RequestContext {
    /// Request line used to attribute diagnostics, e.g. `GET /oauth/user`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Abandons the request; outstanding tokeninfo calls end with `Cancelled`
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}

impl PlatformContext for RequestContext {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn with_namespace(&self, name: &str) -> Result<Self, NamespaceError> {
        validate_namespace(name)?;
        Ok(Self {
            label: self.label.clone(),
            namespace: name.to_string(),
            client: self.client.clone(),
            sink: Arc::clone(&self.sink),
            cancellation: self.cancellation.child_token(),
        })
    }

    fn http_client(&self) -> &Client {
        &self.client
    }

    fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    fn debug(&self, message: &str) {
        if self.namespace.is_empty() {
            self.sink.debug(&self.label, message);
        } else {
            let label = format!("{} ns={}", self.label, self.namespace);
            self.sink.debug(&label, message);
        }
    }
}

fn validate_namespace(name: &str) -> Result<(), NamespaceError> {
    let valid = name.len() <= MAX_NAMESPACE_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(NamespaceError::InvalidName(name.to_string()))
    }
}

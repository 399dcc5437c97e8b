use crate::config::TokeninfoConfig;
use crate::error::{AuthError, ConfigError};
use crate::introspector::TokenIntrospector;
use crate::platform::{Platform, PlatformContext, RequestContext};
use crate::scope::scoped_token_info;
use async_trait::async_trait;
use http::Request;
use http::request::Parts;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Authenticated end user, as known from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
}

/// Request-scoped view of the caller's identity.
///
/// Call sites depend on this trait only, so validators using other verification
/// strategies can be swapped in without touching them.
#[async_trait]
pub trait IdentityContext: Send + Sync {
    /// The inbound request this context was created for
    fn current_request(&self) -> &Parts;

    /// Derives a context operating within the given namespace, sharing the same request
    fn namespace(&self, name: &str) -> Result<Box<dyn IdentityContext>, AuthError>;

    /// Client ID the request's token was issued to, if the token grants `scope`
    async fn current_oauth_client_id(&self, scope: &str) -> Result<String, AuthError>;

    /// User the request's token belongs to, if the token grants `scope`
    async fn current_oauth_user(&self, scope: &str) -> Result<User, AuthError>;
}

/// Identity context validating bearer tokens through the tokeninfo endpoint
#[derive(Debug)]
pub struct TokeninfoContext<C = RequestContext> {
    platform: C,
    request: Arc<Parts>,
    introspector: Arc<TokenIntrospector>,
}

impl<C: PlatformContext> TokeninfoContext<C> {
    pub(crate) fn new(
        platform: C,
        request: Arc<Parts>,
        introspector: Arc<TokenIntrospector>,
    ) -> Self {
        Self {
            platform,
            request,
            introspector,
        }
    }

    pub fn platform(&self) -> &C {
        &self.platform
    }

    /// Shared handle to the wrapped request
    pub fn request(&self) -> &Arc<Parts> {
        &self.request
    }

    /// Same as [`IdentityContext::namespace`], keeping the concrete type
    pub fn with_namespace(&self, name: &str) -> Result<Self, AuthError> {
        let platform = self.platform.with_namespace(name)?;
        Ok(Self::new(
            platform,
            Arc::clone(&self.request),
            Arc::clone(&self.introspector),
        ))
    }
}

#[async_trait]
impl<C: PlatformContext> IdentityContext for TokeninfoContext<C> {
    fn current_request(&self) -> &Parts {
        &self.request
    }

    fn namespace(&self, name: &str) -> Result<Box<dyn IdentityContext>, AuthError> {
        Ok(Box::new(self.with_namespace(name)?))
    }

    async fn current_oauth_client_id(&self, scope: &str) -> Result<String, AuthError> {
        let info =
            scoped_token_info(&self.platform, &self.request, &self.introspector, scope).await?;
        Ok(info.issued_to)
    }

    async fn current_oauth_user(&self, scope: &str) -> Result<User, AuthError> {
        let info =
            scoped_token_info(&self.platform, &self.request, &self.introspector, scope).await?;
        Ok(User { email: info.email })
    }
}

/// Creates [`TokeninfoContext`]s for inbound requests.
///
/// This is the only way to obtain a `TokeninfoContext` outside this crate.
#[derive(Debug, Clone)]
pub struct TokeninfoContextFactory {
    platform: Platform,
    introspector: Arc<TokenIntrospector>,
}

impl TokeninfoContextFactory {
    pub fn new(platform: Platform, introspector: TokenIntrospector) -> Self {
        Self {
            platform,
            introspector: Arc::new(introspector),
        }
    }

    pub fn from_config(config: &TokeninfoConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Platform::from_config(config)?,
            TokenIntrospector::from_config(config)?,
        ))
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Creates the identity context for a request given as its head
    pub fn new_context(&self, request: Parts) -> TokeninfoContext<RequestContext> {
        let platform = self.platform.context_for(&request);
        TokeninfoContext::new(platform, Arc::new(request), Arc::clone(&self.introspector))
    }

    /// Creates the identity context for a full request; the body is not needed and is dropped
    pub fn from_request<B>(&self, request: Request<B>) -> TokeninfoContext<RequestContext> {
        let (parts, _body) = request.into_parts();
        self.new_context(parts)
    }
}

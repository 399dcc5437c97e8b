//! Remote token validation against a tokeninfo endpoint.
//!
//! The endpoint is queried with `GET <endpoint>?access_token=<token>` and answers with
//! a JSON document describing the token. Some failures are reported with a non-200
//! status, others with a 200 and an `error_description`, so the body is decoded
//! regardless of the status before any check is applied.

use crate::config::TokeninfoConfig;
use crate::error::{AuthError, ConfigError};
use crate::platform::PlatformContext;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Token metadata returned by the tokeninfo endpoint.
///
/// When `error_description` is non-empty the remaining fields must not be trusted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenInfo {
    /// Client identifier the token was issued to
    pub issued_to: String,
    pub audience: String,
    /// Opaque identifier of the token's subject
    pub user_id: String,
    /// Space-delimited list of granted scopes
    pub scope: String,
    /// Remaining lifetime in seconds
    pub expires_in: i64,
    pub email: String,
    pub verified_email: bool,
    pub access_type: String,
    pub error_description: String,
}

/// Client for the tokeninfo endpoint
#[derive(Debug, Clone)]
pub struct TokenIntrospector {
    endpoint: Url,
}

impl TokenIntrospector {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    pub fn from_config(config: &TokeninfoConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(Url::parse(&config.endpoint_url)?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches and validates the metadata of `token`.
    ///
    /// The call runs under the context's cancellation token: when it fires, the
    /// outstanding request is dropped and [`AuthError::Cancelled`] is returned.
    pub async fn fetch<C: PlatformContext>(
        &self,
        ctx: &C,
        token: &str,
    ) -> Result<TokenInfo, AuthError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("access_token", token);
        ctx.debug(&format!("Fetching token info from {:?}", url.as_str()));

        let (status, body) = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => return Err(AuthError::Cancelled),
            result = round_trip(ctx, url) => result?,
        };

        let decoded = serde_json::from_slice::<TokenInfo>(&body);
        if status != StatusCode::OK {
            // Rejections are reported even when the body is not a tokeninfo document
            let description = decoded
                .ok()
                .map(|info| info.error_description)
                .filter(|description| !description.is_empty());
            return Err(AuthError::RemoteRejection {
                status: status.as_u16(),
                description,
            });
        }

        let info = decoded?;
        check_token_info(&info)?;
        Ok(info)
    }
}

/// Sends the request and reads the whole body, so the connection is released on return
async fn round_trip<C: PlatformContext>(
    ctx: &C,
    url: Url,
) -> Result<(StatusCode, Vec<u8>), AuthError> {
    let response = ctx.http_client().get(url).send().await?;
    let status = response.status();
    ctx.debug(&format!("Tokeninfo replied with {status}"));
    let body = response.bytes().await?;
    Ok((status, body.to_vec()))
}

/// Freshness and identity checks, applied in order
fn check_token_info(info: &TokenInfo) -> Result<(), AuthError> {
    if info.expires_in <= 0 {
        return Err(AuthError::TokenExpired);
    }
    if !info.verified_email {
        return Err(AuthError::UnverifiedEmail(info.email.clone()));
    }
    if info.email.is_empty() {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

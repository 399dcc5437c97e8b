use crate::error::AuthError;
use crate::introspector::{TokenInfo, TokenIntrospector};
use crate::platform::PlatformContext;
use crate::token::extract_token;
use http::request::Parts;

/// Returns true when `requested` is one of the space-delimited scopes in `granted`.
///
/// Matching is exact per scope. An empty `granted` string holds a single empty
/// scope, so it only matches an empty `requested` scope.
pub fn has_scope(granted: &str, requested: &str) -> bool {
    granted.split(' ').any(|scope| scope == requested)
}

/// Validates the request's bearer token and checks that it grants `scope`.
///
/// Fails with [`AuthError::NoTokenPresent`] before any network call when the
/// request carries no token. Introspection failures are returned unchanged.
pub async fn scoped_token_info<C: PlatformContext>(
    ctx: &C,
    request: &Parts,
    introspector: &TokenIntrospector,
    scope: &str,
) -> Result<TokenInfo, AuthError> {
    let token = extract_token(request).ok_or(AuthError::NoTokenPresent)?;
    let info = introspector.fetch(ctx, &token).await?;
    if has_scope(&info.scope, scope) {
        return Ok(info);
    }
    Err(AuthError::ScopeMismatch {
        granted: info.scope,
        requested: scope.to_string(),
    })
}

use crate::errors::ApiError;
use crate::openapi::IDENTITY_TAG;
use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Query},
    response::{IntoResponse, Response},
    Json,
};
use http::request::Parts;
use http::StatusCode;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokeninfo_auth::IdentityContext;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Identity context of the current request
pub(crate) struct Identity(pub Box<dyn IdentityContext>);

impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Identity(Box::new(state.contexts.new_context(parts.clone()))))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ScopeQuery {
    /// OAuth2 scope the bearer token must grant
    scope: String,
    /// Optional namespace to resolve the identity in
    #[serde(default)]
    namespace: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub(crate) struct ClientIdResponse {
    /// Client the bearer token was issued to
    pub client_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub(crate) struct UserResponse {
    /// Verified email of the token's user
    pub email: String,
    /// Namespace the identity was resolved in, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[utoipa::path(
    get,
    path = "/oauth/client",
    tag = IDENTITY_TAG,
    params(
        ScopeQuery,
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Client ID resolved", body = ClientIdResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Token does not grant the requested scope"),
        (status = 502, description = "Tokeninfo endpoint unreachable or malformed reply")
    )
)]
pub(crate) async fn client_id_handler(
    Identity(ctx): Identity,
    Query(query): Query<ScopeQuery>,
) -> Response {
    let ctx = match scoped(ctx, query.namespace.as_deref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };
    match ctx.current_oauth_client_id(&query.scope).await {
        Ok(client_id) => {
            debug!("Resolved client '{}' for scope '{}'", client_id, query.scope);
            (StatusCode::OK, Json(ClientIdResponse { client_id })).into_response()
        }
        Err(err) => {
            warn!("Failed to resolve OAuth client: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/oauth/user",
    tag = IDENTITY_TAG,
    params(
        ScopeQuery,
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "User resolved", body = UserResponse),
        (status = 400, description = "Invalid namespace"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Token does not grant the requested scope"),
        (status = 502, description = "Tokeninfo endpoint unreachable or malformed reply")
    )
)]
pub(crate) async fn user_handler(
    Identity(ctx): Identity,
    Query(query): Query<ScopeQuery>,
) -> Response {
    let ctx = match scoped(ctx, query.namespace.as_deref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };
    match ctx.current_oauth_user(&query.scope).await {
        Ok(user) => {
            debug!("Resolved user '{}' for scope '{}'", user.email, query.scope);
            let body = UserResponse {
                email: user.email,
                namespace: query.namespace,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            warn!("Failed to resolve OAuth user: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

/// Moves the context into `namespace` when one was requested
fn scoped(
    ctx: Box<dyn IdentityContext>,
    namespace: Option<&str>,
) -> Result<Box<dyn IdentityContext>, ApiError> {
    match namespace {
        Some(name) => ctx.namespace(name).map_err(|err| {
            warn!("Failed to derive namespace '{}': {}", name, err);
            ApiError::from(err)
        }),
        None => Ok(ctx),
    }
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(client_id_handler))
        .routes(routes!(user_handler))
}

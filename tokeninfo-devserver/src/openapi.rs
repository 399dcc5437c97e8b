use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const IDENTITY_TAG: &str = "Identity API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = IDENTITY_TAG, description = "Bearer token identity endpoints"),
    ),
    info(
        title = "Tokeninfo Development Server API",
        description = "Resolves the caller's identity from an OAuth2 bearer token",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;

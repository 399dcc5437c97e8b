use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub(crate) struct HealthResponse {
    /// Always "ok" while the server is accepting requests
    pub status: String,
    /// The tokeninfo endpoint bearer tokens are validated against
    pub tokeninfo_endpoint: String,
}

/// Liveness check; the tokeninfo endpoint itself is not probed
#[utoipa::path(
    get,
    path = "/healthy",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub(crate) async fn healthy_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        tokeninfo_endpoint: state.config.tokeninfo.endpoint_url.clone(),
    })
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(healthy_check))
}

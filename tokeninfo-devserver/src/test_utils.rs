use crate::config::ServerConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Test fixture wiring the dev server against a mocked tokeninfo endpoint.
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     fixture
///         .add_tokeninfo_mock("token", json!({"issued_to": "client"}), StatusCode::OK, 1)
///         .await;
///
///     let response = fixture.get("/oauth/client?scope=email", Some("token")).await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration pointing at the mock
    pub config: ServerConfig,
    /// State shared with the router
    pub state: AppState,
    /// Mock server standing in for the tokeninfo endpoint
    pub tokeninfo_mock: MockServer,
}

impl TestFixture {
    pub async fn new() -> Self {
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let tokeninfo_mock = MockServer::start().await;
        let config = ServerConfig::for_test_with_mock(&tokeninfo_mock);

        let state = AppState::new(&config).expect("Failed to create test state");
        let app = create_app(state.clone()).await;

        Self {
            app,
            config,
            state,
            tokeninfo_mock,
        }
    }

    /// Request builder that carries `token` as a bearer credential when given.
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> http::request::Builder {
        let builder = Request::builder().method(method).uri(uri.as_ref());
        match token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Sends a GET request, optionally authenticated with `token`.
    pub async fn get(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Non-JSON bodies (e.g. axum's plain-text rejections) become an empty object
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse { status, json }
    }

    /// Mounts a tokeninfo reply for `token`.
    ///
    /// The mock only matches `GET /oauth2/v2/tokeninfo?access_token=<token>` and
    /// verifies on drop that it was hit exactly `expected_calls` times.
    pub async fn add_tokeninfo_mock(
        &self,
        token: &str,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/oauth2/v2/tokeninfo"))
            .and(matchers::query_param("access_token", token))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.tokeninfo_mock)
            .await;
    }
}

/// Status and JSON body of a response returned by the router
pub struct TestResponse {
    pub status: StatusCode,
    /// Response body as JSON (an empty object if absent or not JSON)
    pub json: Value,
}

impl TestResponse {
    /// Panics unless the status matches; returns self for chaining.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}

use http::header::AUTHORIZATION;
use http::request::Parts;
use url::form_urlencoded;

/// Authorization schemes accepted in the `Authorization` header (case-insensitive)
const AUTH_SCHEMES: [&str; 2] = ["bearer", "oauth"];

/// Query parameters checked, in order, when the header carries no token
const TOKEN_QUERY_PARAMS: [&str; 2] = ["access_token", "bearer_token"];

/// Extracts the bearer token presented on a request.
///
/// The `Authorization` header takes precedence over query parameters.
/// Empty tokens are treated as absent.
pub fn extract_token(request: &Parts) -> Option<String> {
    if let Some(token) = token_from_header(request) {
        return Some(token);
    }
    token_from_query(request)
}

fn token_from_header(request: &Parts) -> Option<String> {
    let value = request.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !AUTH_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn token_from_query(request: &Parts) -> Option<String> {
    let query = request.uri.query()?;
    TOKEN_QUERY_PARAMS.iter().find_map(|param| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, value)| key == *param && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })
}

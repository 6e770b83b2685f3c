use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use docathome_core::error::ApiError;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::socket::SOCKET_PATH;

/// Methods advertised to browsers for the REST API.
const API_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// Methods the Socket.IO handshake may use.
const SOCKET_METHODS: [Method; 2] = [Method::GET, Method::POST];

/// Decides whether a request's declared origin may reach the gateway.
#[derive(Clone, Copy, Debug)]
pub struct OriginPolicy {
    allowed: &'static [&'static str],
}

impl OriginPolicy {
    pub const fn new(allowed: &'static [&'static str]) -> Self {
        OriginPolicy { allowed }
    }

    /// Requests without an origin (same-origin, curl, server to server) are
    /// always allowed.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None | Some("") => true,
            Some(origin) => self.allowed.iter().any(|allowed| *allowed == origin),
        }
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(value) = headers.get(header::ORIGIN) else {
            return Ok(());
        };

        match value.to_str() {
            Ok(origin) if self.is_allowed(Some(origin)) => Ok(()),
            Ok(origin) => Err(ApiError::OriginRejected(origin.to_owned())),
            Err(_) => Err(ApiError::OriginRejected(
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )),
        }
    }

    /// Layer that writes the `Access-Control-*` headers for allowed origins.
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(
                self.allowed.iter().copied().map(HeaderValue::from_static),
            ))
            .allow_methods(API_METHODS)
            .allow_headers(AllowHeaders::mirror_request())
    }
}

/// Rejects requests whose `Origin` is not allowed before any handler runs.
pub async fn enforce_origin_policy(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    policy.check(request.headers())?;

    Ok(next.run(request).await)
}

/// Restricts the Socket.IO handshake to GET and POST.
pub async fn guard_socket_handshake(request: Request, next: Next) -> Result<Response, ApiError> {
    if request.uri().path().starts_with(SOCKET_PATH) && !is_socket_method(&request) {
        return Err(ApiError::MethodNotAllowed);
    }

    Ok(next.run(request).await)
}

fn is_socket_method(request: &Request) -> bool {
    if request.method() != Method::OPTIONS {
        return SOCKET_METHODS.contains(request.method());
    }

    // preflight: judge the method the browser intends to send
    match request.headers().get(header::ACCESS_CONTROL_REQUEST_METHOD) {
        None => true,
        Some(requested) => SOCKET_METHODS
            .iter()
            .any(|method| requested.as_bytes() == method.as_str().as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ALLOWED_ORIGINS;

    const POLICY: OriginPolicy = OriginPolicy::new(ALLOWED_ORIGINS);

    #[test]
    fn allows_listed_and_missing_origins() {
        assert!(POLICY.is_allowed(None));
        assert!(POLICY.is_allowed(Some("")));
        assert!(POLICY.is_allowed(Some("http://localhost:5173")));
        assert!(POLICY.is_allowed(Some("https://docathome-rajnandini.netlify.app")));
    }

    #[test]
    fn rejects_everything_else() {
        for origin in [
            "https://evil.example",
            "http://localhost:5174",
            "https://docathome-rajnandini.netlify.app/",
            "HTTP://LOCALHOST:5173",
            "null",
        ] {
            assert!(!POLICY.is_allowed(Some(origin)), "{origin} should be rejected");
        }
    }

    #[test]
    fn check_reports_the_rejected_origin() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://evil.example"));

        match POLICY.check(&headers) {
            Err(ApiError::OriginRejected(origin)) => assert_eq!(origin, "https://evil.example"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn check_passes_without_origin_header() {
        assert!(POLICY.check(&HeaderMap::new()).is_ok());
    }
}

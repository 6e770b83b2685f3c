use axum::{
    body::{Body, to_bytes},
    extract::{FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use docathome_core::error::ApiError;
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Largest JSON body accepted, in bytes.
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

/// The parsed request body, stored in the request extensions by
/// [`parse_json_body`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedJson(pub Value);

/// Parses `application/json` bodies before any route handler runs.
///
/// The raw bytes are put back so handlers reading the body themselves still
/// see it. An empty body parses as `{}`.
pub async fn parse_json_body(request: Request, next: Next) -> Result<Response, ApiError> {
    if !is_json(request.headers()) {
        return Ok(next.run(request).await);
    }

    let declared_len = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > JSON_BODY_LIMIT) {
        return Err(ApiError::PayloadTooLarge);
    }

    let (mut parts, body) = request.into_parts();
    let bytes = to_bytes(body, JSON_BODY_LIMIT)
        .await
        .map_err(body_read_error)?;

    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&bytes)?
    };

    parts.extensions.insert(ParsedJson(value));

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn body_read_error(err: axum::Error) -> ApiError {
    let inner = err.into_inner();
    if inner.is::<LengthLimitError>() {
        ApiError::PayloadTooLarge
    } else {
        ApiError::Internal(anyhow::anyhow!("cannot read JSON body: {inner}"))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Typed view of the body parsed by [`parse_json_body`].
///
/// This is the extractor route-group handlers take JSON input through.
/// Requests that carried no JSON body deserialize from `{}`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequestParts<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .extensions
            .get::<ParsedJson>()
            .map(|parsed| parsed.0.clone())
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok(JsonBody(serde_json::from_value(value)?))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn detects_json_content_types() {
        assert!(is_json(&headers_with("application/json")));
        assert!(is_json(&headers_with("application/json; charset=utf-8")));
        assert!(is_json(&headers_with("Application/JSON")));
    }

    #[tokio::test]
    async fn only_length_limit_errors_count_as_too_large() {
        let oversized = to_bytes(Body::from(vec![b'x'; 16]), 8).await.unwrap_err();
        assert!(matches!(body_read_error(oversized), ApiError::PayloadTooLarge));

        let dropped = Body::from_stream(futures_util::stream::iter([
            Ok(axum::body::Bytes::from_static(b"{\"slot\":")),
            Err(std::io::Error::from(std::io::ErrorKind::ConnectionReset)),
        ]));
        let aborted = to_bytes(dropped, JSON_BODY_LIMIT).await.unwrap_err();
        assert!(matches!(body_read_error(aborted), ApiError::Internal(_)));
    }

    #[test]
    fn ignores_other_content_types() {
        assert!(!is_json(&headers_with("text/plain")));
        assert!(!is_json(&headers_with("multipart/form-data; boundary=x")));
        assert!(!is_json(&HeaderMap::new()));
    }
}

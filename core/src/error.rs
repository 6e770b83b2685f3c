use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::Message;

pub const NOT_FOUND_MESSAGE: &str = "API endpoint not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Every failure a request can end with.
///
/// Route groups return this from their handlers and the gateway middleware
/// uses it for its own rejections. Everything except `NotFound` and
/// `MethodNotAllowed` is a fault: logged with full detail while the client
/// only ever sees the generic 500 message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no route matches the request")]
    NotFound,

    #[error("origin `{0}` is not allowed by CORS")]
    OriginRejected(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_fault(&self) -> bool {
        !matches!(self, Self::NotFound | Self::MethodNotAllowed)
    }

    /// Message sent to the client. Never carries internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::MethodNotAllowed => "Method not allowed",
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound => {}
            Self::MethodNotAllowed => tracing::debug!(error = %self, "request rejected"),
            _ => tracing::error!(error = ?self, "unhandled error while serving request"),
        }

        (self.status(), Json(Message::new(self.public_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use sea_orm::{DbErr, RuntimeErr};

    use super::*;

    async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn not_found_uses_the_endpoint_message() {
        let (status, body) = body_of(ApiError::NotFound).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "message": "API endpoint not found" }));
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_detail() {
        let error = anyhow::anyhow!("connection string postgres://admin:secret@db");
        let (status, body) = body_of(ApiError::from(error)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "message": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn database_errors_map_to_internal() {
        let error = DbErr::Conn(RuntimeErr::Internal("pool timed out".into()));
        let (status, body) = body_of(error.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn malformed_json_is_a_generic_fault() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let (status, body) = body_of(parse_error.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "message": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn middleware_rejections_are_generic_faults() {
        for error in [
            ApiError::OriginRejected("https://evil.example".into()),
            ApiError::PayloadTooLarge,
        ] {
            assert!(error.is_fault());
            let (status, body) = body_of(error).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, serde_json::json!({ "message": "Internal Server Error" }));
        }
    }

    #[test]
    fn routing_misses_are_not_faults() {
        assert!(!ApiError::NotFound.is_fault());
        assert!(!ApiError::MethodNotAllowed.is_fault());
    }
}

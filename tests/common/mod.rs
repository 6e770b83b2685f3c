#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use docathome::app::state::AppState;
use docathome::bootstrap::{DatabaseConnector, SeaOrmConnector};
use docathome::routes::{self, RouteGroup};
use docathome::socket::{ConnectionObserver, TracingObserver, create_socket_layer};
use sea_orm::{DatabaseConnection, DbErr, RuntimeErr};
use serde_json::Value;

pub const SQLITE_MEMORY: &str = "sqlite::memory:";

pub async fn sqlite_state() -> AppState {
    let db = SeaOrmConnector::new(SQLITE_MEMORY).connect().await.unwrap();
    AppState::new(db)
}

/// The gateway router over an in-memory database.
pub async fn app(groups: &[RouteGroup]) -> Router {
    let (socket_layer, _io) = create_socket_layer(Arc::new(TracingObserver));
    routes::routes(groups, sqlite_state().await, socket_layer)
}

pub fn no_docs() -> utoipa::openapi::OpenApi {
    utoipa::openapi::OpenApiBuilder::new().build()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}

/// Connector standing in for an unreachable database.
pub struct FailingConnector;

impl DatabaseConnector for FailingConnector {
    async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        Err(DbErr::Conn(RuntimeErr::Internal(
            "connection refused (os error 111)".into(),
        )))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SocketEvent {
    Connected(String),
    Disconnected(String),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SocketEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<SocketEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ConnectionObserver for RecordingObserver {
    fn connected(&self, id: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SocketEvent::Connected(id.to_owned()));
    }

    fn disconnected(&self, id: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SocketEvent::Disconnected(id.to_owned()));
    }
}

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sea_orm::DbErr;
use tokio::net::TcpListener;

use crate::app::state::AppState;
use crate::bootstrap::database::{DatabaseConnector, SeaOrmConnector};
use crate::config::AppConfig;
use crate::routes::{self, ROUTE_GROUPS, RouteGroup};
use crate::socket::{self, ConnectionObserver, TracingObserver};

/// Why the gateway could not come up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid configuration: {0:#}")]
    Config(anyhow::Error),

    #[error("could not connect to the database: {0}")]
    Database(#[from] DbErr),

    #[error("cannot bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("server error: {0}")]
    Serve(io::Error),
}

impl StartupError {
    /// Logs the failure the way operators grep for it.
    pub fn report(&self) {
        match self {
            StartupError::Database(err) => {
                tracing::error!("FATAL ERROR: Could not connect to the database.");
                tracing::error!("{err:?}");
            }
            other => tracing::error!("FATAL ERROR: {other}"),
        }
    }
}

/// A gateway that reached `Ready`: database connected, listener bound.
pub struct Gateway {
    listener: TcpListener,
    app: Router,
}

impl Gateway {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until Ctrl-C or SIGTERM.
    pub async fn serve(self) -> io::Result<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    pub async fn serve_with_shutdown<F>(self, signal: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(signal)
            .await
    }
}

/// Connects to the database and, only if that succeeds, binds `addr`.
///
/// `Connecting → Ready` returns the bound [`Gateway`]; `Connecting → Failed`
/// returns the error without ever touching the port.
pub async fn start<C>(
    addr: SocketAddr,
    connector: &C,
    groups: &[RouteGroup],
    observer: Arc<dyn ConnectionObserver>,
) -> Result<Gateway, StartupError>
where
    C: DatabaseConnector,
{
    tracing::info!("connecting to database");
    let db = connector.connect().await?;

    let (socket_layer, _io) = socket::create_socket_layer(observer);
    let app = routes::routes(groups, AppState::new(db), socket_layer);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    let port = listener
        .local_addr()
        .map(|local| local.port())
        .unwrap_or(addr.port());
    tracing::info!("Server running on port {}", port);

    Ok(Gateway { listener, app })
}

/// Entry point used by `main`: environment config, sea-orm, every route group.
pub async fn init_server() -> Result<(), StartupError> {
    let config = AppConfig::get().await.map_err(StartupError::Config)?;
    let connector = SeaOrmConnector::new(config.database_url.clone());

    let gateway = start(
        config.socket_addr(),
        &connector,
        &ROUTE_GROUPS,
        Arc::new(TracingObserver),
    )
    .await?;

    gateway.serve().await.map_err(StartupError::Serve)?;
    tracing::info!("server stopped");

    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("cannot listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("cannot listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

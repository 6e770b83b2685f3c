mod database;
mod env;
mod server;
mod tracing;

pub use database::{DatabaseConnector, SeaOrmConnector};
pub use server::{Gateway, StartupError, init_server, shutdown_signal, start};

pub async fn init_base() {
    let env = env::init_env().await;
    tracing::init_tracing().await;

    match env {
        Ok(Some(path)) => ::tracing::debug!("loaded environment from {}", path.display()),
        Ok(None) => ::tracing::debug!("no `.env` file found, using the process environment"),
        Err(err) => ::tracing::warn!("cannot load `.env`: {err}"),
    }
}

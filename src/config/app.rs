use std::net::SocketAddr;

use docathome_core::config::ConfigBuilder;
use tokio::sync::OnceCell;

static APP: OnceCell<AppConfig> = OnceCell::const_new();

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
}

impl AppConfig {
    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|raw| !raw.trim().is_empty()) {
            None => {
                tracing::debug!("`PORT` not set, defaulting to `{DEFAULT_PORT}`");
                DEFAULT_PORT
            }
            Some(raw) => raw.trim().parse().unwrap_or_else(|err| {
                tracing::error!("cannot parse `PORT` ({raw:?}). defaulting to {DEFAULT_PORT} {err:?}");
                DEFAULT_PORT
            }),
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("cannot read `DATABASE_URL`"))?;

        Ok(AppConfig { port, database_url })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Process-wide config, read from the environment on first use.
    pub async fn get() -> anyhow::Result<AppConfig> {
        APP.get_or_try_init(|| async { AppConfig::build() })
            .await
            .cloned()
    }
}

impl ConfigBuilder for AppConfig {
    fn build() -> anyhow::Result<Self> {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }
}

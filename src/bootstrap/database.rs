use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Establishes the persistence connection the gateway is gated on.
pub trait DatabaseConnector {
    fn connect(&self) -> impl std::future::Future<Output = Result<DatabaseConnection, DbErr>> + Send;
}

/// Connects through sea-orm using the configured `DATABASE_URL`.
#[derive(Clone, Debug)]
pub struct SeaOrmConnector {
    options: ConnectOptions,
}

impl SeaOrmConnector {
    pub fn new(database_url: impl Into<String>) -> Self {
        let mut options = ConnectOptions::new(database_url.into());
        options
            .connect_timeout(CONNECT_TIMEOUT)
            .acquire_timeout(ACQUIRE_TIMEOUT);

        SeaOrmConnector { options }
    }
}

impl DatabaseConnector for SeaOrmConnector {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        let connection = Database::connect(self.options.clone()).await?;
        tracing::info!("database connection established");

        Ok(connection)
    }
}

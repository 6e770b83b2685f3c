use docathome_core::error::ApiError;
use sea_orm::DatabaseConnection;

use crate::app::response::GroupStatus;

/// Shared with every handler through an `Extension` layer.
#[derive(Clone, Debug)]
pub struct AppState {
    db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        AppState { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Confirms a route group is mounted and the database still answers.
    pub async fn group_status(&self, group: &str) -> Result<GroupStatus, ApiError> {
        self.db.ping().await?;

        Ok(GroupStatus::ok(group))
    }
}

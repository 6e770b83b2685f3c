use axum::{Extension, Json};
use docathome_core::{error::ApiError, response::Message};

use crate::app::{response::GroupStatus, state::AppState};

pub struct AdminController;

#[docathome_macros::controller]
impl AdminController {
    #[docathome_macros::get("/status")]
    #[docathome_macros::utoipa_response(status = 200, body = GroupStatus, description = "Admin routes are mounted")]
    #[docathome_macros::utoipa_response(status = 500, body = Message)]
    pub async fn status(Extension(state): Extension<AppState>) -> Result<Json<GroupStatus>, ApiError> {
        state.group_status("admin").await.map(Json)
    }
}

use axum::{Extension, Json};
use docathome_core::{error::ApiError, response::Message};

use crate::app::{response::GroupStatus, state::AppState};

/// Doctor directory.
pub struct DoctorController;

#[docathome_macros::controller]
impl DoctorController {
    #[docathome_macros::get("/status")]
    #[docathome_macros::utoipa_response(status = 200, body = GroupStatus, description = "Doctor routes are mounted")]
    #[docathome_macros::utoipa_response(status = 500, body = Message)]
    pub async fn status(Extension(state): Extension<AppState>) -> Result<Json<GroupStatus>, ApiError> {
        state.group_status("doctors").await.map(Json)
    }
}

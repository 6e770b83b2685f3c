use axum::{Extension, Json};
use docathome_core::{error::ApiError, response::Message};

use crate::app::{response::GroupStatus, state::AppState};

/// Appointments between patients and staff, mounted at `/api/appointments`.
pub struct AppointmentController;

#[docathome_macros::controller]
impl AppointmentController {
    #[docathome_macros::get("/status")]
    #[docathome_macros::utoipa_response(status = 200, body = GroupStatus, description = "Appointment routes are mounted")]
    #[docathome_macros::utoipa_response(status = 500, body = Message)]
    pub async fn status(Extension(state): Extension<AppState>) -> Result<Json<GroupStatus>, ApiError> {
        state.group_status("appointments").await.map(Json)
    }
}

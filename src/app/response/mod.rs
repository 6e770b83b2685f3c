#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct GroupStatus {
    pub group: String,
    pub status: String,
}

impl GroupStatus {
    pub fn ok(group: &str) -> Self {
        GroupStatus {
            group: group.to_owned(),
            status: "ok".to_owned(),
        }
    }
}

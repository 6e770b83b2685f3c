use std::path::Path;

use docathome_core::response::Message;
use tokio::io::AsyncWriteExt;
use utoipa::OpenApi;

use crate::app::response::GroupStatus;
use crate::routes::{ROUTE_GROUPS, RouteGroup};

#[derive(OpenApi)]
#[openapi(
    components(schemas(Message, GroupStatus)),
    info(title = "DocAtHome API", description = "API Docs")
)]
pub struct MainApiDoc;

/// The gateway document with every route group nested under its prefix.
pub fn openapi(groups: &[RouteGroup]) -> utoipa::openapi::OpenApi {
    groups
        .iter()
        .fold(MainApiDoc::openapi(), |doc, group| {
            doc.nest(group.prefix, (group.openapi)())
        })
}

pub async fn generate_docs(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;

    let docs = openapi(&ROUTE_GROUPS).to_pretty_json()?;

    file.write_all(docs.as_bytes()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_status_route() {
        let doc = openapi(&ROUTE_GROUPS);

        for group in ROUTE_GROUPS {
            let expected = format!("{}/status", group.prefix);
            assert!(
                doc.paths.paths.contains_key(&expected),
                "missing {expected} in {:?}",
                doc.paths.paths.keys().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn operation_ids_are_unique() {
        let doc = openapi(&ROUTE_GROUPS);
        let json = serde_json::to_value(&doc).unwrap();

        let mut ids = Vec::new();
        for item in json["paths"].as_object().unwrap().values() {
            for operation in item.as_object().unwrap().values() {
                if let Some(id) = operation.get("operationId").and_then(|id| id.as_str()) {
                    ids.push(id.to_owned());
                }
            }
        }

        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, ROUTE_GROUPS.len());
    }
}

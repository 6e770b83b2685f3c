//! Writes the OpenAPI document of every mounted route group to `api.json`.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "api.json".into());

    docathome::docs::generate_docs(&path).await?;
    println!("wrote {path}");

    Ok(())
}

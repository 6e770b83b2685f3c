use std::path::PathBuf;

/// Loads `.env` into the process environment.
///
/// Runs before tracing is installed, so the outcome is handed back to the
/// caller to be logged afterwards.
pub async fn init_env() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

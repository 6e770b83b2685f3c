use anyhow::Result;

/// Trait for building configuration structs
///
/// Implementors read from environment variables, files, or other sources and
/// construct the configuration struct. Callers usually cache the result in a
/// `OnceCell` so the environment is only read once per process.
pub trait ConfigBuilder: Clone + Send + Sync + 'static {
    /// Build the configuration instance
    fn build() -> Result<Self>;
}

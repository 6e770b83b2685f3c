use tracing_subscriber::{EnvFilter, fmt::writer::MakeWriterExt};

pub async fn init_tracing() {
    // warnings and errors go to stderr, the rest to stdout
    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();
}

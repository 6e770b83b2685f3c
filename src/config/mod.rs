mod app;

pub use app::{AppConfig, DEFAULT_PORT};

/// Browser origins allowed to call the API and open a socket.
pub const ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "https://docathome-rajnandini.netlify.app",
];

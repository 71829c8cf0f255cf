//! Server configuration, read once from the environment at startup.

use std::net::SocketAddr;

/// Runtime configuration; every field has a sensible default so the server
/// runs out of the box.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// Comma-separated allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("FOLIOTRACK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("FOLIOTRACK_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let listen_addr = format!("{}:{}", host, port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let db_path =
            std::env::var("FOLIOTRACK_DB_PATH").unwrap_or_else(|_| "foliotrack.db".to_string());

        let cors_origins = std::env::var("FOLIOTRACK_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let log_format =
            std::env::var("FOLIOTRACK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Self {
            listen_addr,
            db_path,
            cors_origins,
            log_format,
        }
    }
}

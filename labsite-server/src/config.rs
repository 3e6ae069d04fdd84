//! Server configuration - listener, database, and upload storage
//!
//! All sections deserialize from TOML with defaults for every field, so a
//! config file only needs the values it overrides.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

/// Default maximum connections for the pool.
/// Kept low, the site sees little concurrent traffic.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Directory and URL segment uploads live under unless configured
pub const DEFAULT_UPLOAD_DIR: &str = "profile";

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = `cors_origins` only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Origins allowed when not permissive
    pub cors_origins: Vec<String>,

    /// Requests running longer than this are aborted
    pub request_timeout_secs: u64,

    /// Upper bound for a request body, uploads included
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_permissive: false,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            request_timeout_secs: 30,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: Option<String>,

    /// Share connections through a pool (default) instead of connecting per request
    pub pooled: bool,

    /// Pool size when `pooled` is set
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pooled: true,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Upload storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,

    /// URL segment the directory is served under; prefixes stored image paths
    pub public_path: String,
}

impl StorageConfig {
    /// Create config with explicit upload directory (for testing)
    pub fn with_root(upload_dir: PathBuf) -> Self {
        Self {
            upload_dir,
            ..Self::default()
        }
    }

    /// Public path without surrounding slashes.
    pub fn public_path(&self) -> String {
        let trimmed = self.public_path.trim_matches('/');
        if trimmed.is_empty() {
            DEFAULT_UPLOAD_DIR.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            public_path: DEFAULT_UPLOAD_DIR.to_string(),
        }
    }
}

//! labsite-server: HTTP backend for the lab website
//!
//! Serves news posts and lab members from PostgreSQL, accepts image
//! uploads alongside them, and serves the uploaded files back.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod storage;

pub use config::{DatabaseConfig, ServerConfig, StorageConfig};
pub use db::{provider_from_config, DbError};
pub use http::{build_router, run_server, AppState, ServerError};
pub use storage::{StorageError, UploadStore};

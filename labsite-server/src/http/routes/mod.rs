//! Route handlers organized by resource

pub mod diagnostics;
pub mod members;
pub mod news;

use serde::Serialize;

/// `{"message": ...}` body returned by write endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

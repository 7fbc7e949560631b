//! Response shapes shared by every handler

use serde::{Deserialize, Serialize};

/// Error body. `detail` is what the web client displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    /// Error code for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>, code: &str) -> Self {
        Self {
            detail: detail.into(),
            code: Some(code.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub mod auth;
pub mod dto;
pub mod handler;

use async_trait::async_trait;
use thiserror::Error;

pub use dto::SheetTable;
pub use handler::GoogleSheets;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Sheets API responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Invalid service account key: {0}")]
    Key(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can hand back a worksheet as a table. The catalog only
/// talks to this, so it can be fed from memory in tests.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn read_table(&self, worksheet: &str) -> Result<SheetTable, SheetError>;
}

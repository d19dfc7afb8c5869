mod auth;
mod client;

pub use client::SheetsClient;

// Re-export clear_tokens for CLI usage
pub use auth::clear_tokens as clear_sheets_tokens;

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SheetOperations {
    /// Append one row at the end of the configured range.
    async fn append_row(&self, row: Vec<String>) -> Result<()>;
}

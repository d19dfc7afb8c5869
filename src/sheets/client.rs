use super::SheetOperations;
use crate::config::{GoogleConfig, SheetConfig};
use crate::error::{AppError, Result};
use crate::sheets::auth::create_and_verify_authenticator;
use async_trait::async_trait;
use google_sheets4::api::{Scope, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use tracing::{debug, instrument};

// Read/write access to spreadsheets the user grants access to.
pub(crate) const AUTH_SCOPE: Scope = Scope::Spreadsheet;

// Rows are interpreted as if typed into the sheet, so the target
// spreadsheet's date and number formatting rules apply.
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    sheet: SheetConfig,
}

impl SheetsClient {
    /// Create a new SheetsClient with authenticated access
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(google: &GoogleConfig, sheet: SheetConfig) -> Result<Self> {
        let auth = create_and_verify_authenticator(google).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Sheets(format!("Failed to load native roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);
        let hub = Sheets::new(client, auth);

        Ok(Self { hub, sheet })
    }
}

/// A single row wrapped in the shape the append endpoint expects.
fn row_value_range(row: Vec<String>) -> ValueRange {
    ValueRange {
        major_dimension: Some("ROWS".to_string()),
        range: None,
        values: Some(vec![row.into_iter().map(Value::String).collect()]),
    }
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Appending row", skip_all, fields(range = %self.sheet.range))]
    async fn append_row(&self, row: Vec<String>) -> Result<()> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_append(
                row_value_range(row),
                &self.sheet.spreadsheet_id,
                &self.sheet.range,
            )
            .value_input_option(VALUE_INPUT_OPTION)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| {
                AppError::Sheets(format!(
                    "Failed to append to range '{}': {}",
                    self.sheet.range, e
                ))
            })?;

        debug!(updated_range = ?response.updates.and_then(|u| u.updated_range), "Row appended");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_appended_as_user_entered() {
        // The sheet applies its own date/number formatting, which the
        // "RAW" mode would bypass.
        assert_eq!(VALUE_INPUT_OPTION, "USER_ENTERED");
    }

    #[test]
    fn test_row_value_range_wraps_a_single_row() {
        let range = row_value_range(vec!["5/3/2024".to_string(), "36.05".to_string()]);

        assert_eq!(range.major_dimension.as_deref(), Some("ROWS"));
        assert_eq!(
            range.values,
            Some(vec![vec![
                Value::String("5/3/2024".to_string()),
                Value::String("36.05".to_string()),
            ]])
        );
    }
}

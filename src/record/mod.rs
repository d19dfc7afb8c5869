use crate::error::{AppError, Result};
use crate::quotes::QuoteOperations;
use crate::sheets::SheetOperations;
use chrono::{Datelike, Local, NaiveDate};
use tracing::{info, instrument, warn};

/// Outcome of one recording run. A failed quote leaves an empty cell in the
/// appended row rather than aborting the run, so callers inspect
/// `failed_sources` to tell a complete row from a partial one.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordReport {
    pub row: Vec<String>,
    pub failed_sources: Vec<&'static str>,
}

impl RecordReport {
    pub fn is_complete(&self) -> bool {
        self.failed_sources.is_empty()
    }

    /// Fold the report into an exit status: a partial row was appended but
    /// the run still counts as failed.
    pub fn into_result(self) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }

        Err(AppError::Scrape(format!(
            "Row appended with missing quotes: {}",
            self.failed_sources.join(", ")
        )))
    }
}

pub struct Recorder<QC, SC> {
    quote_client: QC,
    sheets_client: SC,
}

impl<QC, SC> Recorder<QC, SC>
where
    QC: QuoteOperations + Sync,
    SC: SheetOperations + Sync,
{
    pub fn new(quote_client: QC, sheets_client: SC) -> Self {
        Self {
            quote_client,
            sheets_client,
        }
    }

    #[instrument(name = "Recording quotes", skip_all)]
    pub async fn record(&self) -> Result<RecordReport> {
        self.record_on(Local::now().date_naive()).await
    }

    async fn record_on(&self, date: NaiveDate) -> Result<RecordReport> {
        // The three fetches are independent, so run them concurrently.
        let (dollar, bitcoin, ethereum) = tokio::join!(
            self.quote_client.fetch_dollar(),
            self.quote_client.fetch_bitcoin(),
            self.quote_client.fetch_ethereum(),
        );

        let mut failed_sources = Vec::new();
        let row = vec![
            format_date(date),
            unwrap_or_empty("dollar", dollar, &mut failed_sources),
            unwrap_or_empty("bitcoin", bitcoin, &mut failed_sources),
            unwrap_or_empty("ethereum", ethereum, &mut failed_sources),
        ];

        // A partial row is still worth a data point; an append failure is not
        // recoverable and propagates.
        self.sheets_client.append_row(row.clone()).await?;

        info!(?row, "Row appended");

        Ok(RecordReport {
            row,
            failed_sources,
        })
    }
}

fn unwrap_or_empty(
    source: &'static str,
    result: Result<String>,
    failed_sources: &mut Vec<&'static str>,
) -> String {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(source, "Quote fetch failed: {}", e);
            failed_sources.push(source);
            String::new()
        }
    }
}

/// Day/month/year with a 1-indexed month and no zero padding, matching the
/// format the target sheet's formulas already expect.
fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

#[cfg(test)]
mod mocks {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    pub(crate) struct MockQuoteClient {
        pub dollar: Result<String>,
        pub bitcoin: Result<String>,
        pub ethereum: Result<String>,
    }

    impl MockQuoteClient {
        pub(crate) fn ok(dollar: &str, bitcoin: &str, ethereum: &str) -> Self {
            Self {
                dollar: Ok(dollar.to_string()),
                bitcoin: Ok(bitcoin.to_string()),
                ethereum: Ok(ethereum.to_string()),
            }
        }
    }

    fn clone_result(result: &Result<String>) -> Result<String> {
        match result {
            Ok(value) => Ok(value.clone()),
            Err(e) => Err(AppError::Scrape(e.to_string())),
        }
    }

    #[async_trait]
    impl QuoteOperations for MockQuoteClient {
        async fn fetch_dollar(&self) -> Result<String> {
            clone_result(&self.dollar)
        }

        async fn fetch_bitcoin(&self) -> Result<String> {
            clone_result(&self.bitcoin)
        }

        async fn fetch_ethereum(&self) -> Result<String> {
            clone_result(&self.ethereum)
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct MockSheetsClient {
        pub appended_rows: Arc<Mutex<Vec<Vec<String>>>>,
        pub fail_append: bool,
    }

    #[async_trait]
    impl SheetOperations for MockSheetsClient {
        async fn append_row(&self, row: Vec<String>) -> Result<()> {
            if self.fail_append {
                return Err(AppError::Sheets("append rejected".to_string()));
            }

            self.appended_rows.lock().unwrap().push(row);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{MockQuoteClient, MockSheetsClient};
    use super::*;

    fn fixed_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_date_format_is_unpadded_day_month_year() {
        assert_eq!(format_date(fixed_date()), "5/3/2024");
        assert_eq!(
            format_date(NaiveDate::from_ymd_opt(2024, 11, 25).unwrap()),
            "25/11/2024"
        );
    }

    #[tokio::test]
    async fn test_row_order_is_date_dollar_bitcoin_ethereum() {
        let sheets_client = MockSheetsClient::default();
        let recorder = Recorder::new(
            MockQuoteClient::ok("1234.5", "61000", "3200"),
            sheets_client.clone(),
        );

        let report = recorder.record_on(fixed_date()).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.row, vec!["5/3/2024", "1234.5", "61000", "3200"]);
        assert_eq!(
            *sheets_client.appended_rows.lock().unwrap(),
            vec![report.row]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_empty_cell_and_is_reported() {
        let sheets_client = MockSheetsClient::default();
        let quote_client = MockQuoteClient {
            dollar: Ok("36.05".to_string()),
            bitcoin: Err(AppError::Scrape("selector missing".to_string())),
            ethereum: Ok("3200".to_string()),
        };
        let recorder = Recorder::new(quote_client, sheets_client.clone());

        let report = recorder.record_on(fixed_date()).await.unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failed_sources, vec!["bitcoin"]);
        // The partial row is still appended, with an empty cell in place.
        assert_eq!(report.row, vec!["5/3/2024", "36.05", "", "3200"]);
        assert_eq!(sheets_client.appended_rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_failure_propagates() {
        let sheets_client = MockSheetsClient {
            fail_append: true,
            ..Default::default()
        };
        let recorder = Recorder::new(MockQuoteClient::ok("1", "2", "3"), sheets_client);

        let err = recorder.record_on(fixed_date()).await.unwrap_err();
        assert!(matches!(err, AppError::Sheets(_)));
    }

    #[test]
    fn test_partial_report_converts_to_error() {
        let report = RecordReport {
            row: vec!["5/3/2024".into(), "".into(), "61000".into(), "3200".into()],
            failed_sources: vec!["dollar"],
        };

        let err = report.into_result().unwrap_err();
        assert!(err.to_string().contains("dollar"));
    }
}

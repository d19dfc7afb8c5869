use crate::config::Config;
use crate::error::Result;
use crate::quotes::QuoteClient;
use crate::record::Recorder;
use crate::sheets::SheetsClient;

pub async fn execute() -> Result<()> {
    let config = Config::load()?;
    let quote_client = QuoteClient::new(config.sources)?;
    let sheets_client = SheetsClient::new(&config.google, config.sheet).await?;

    let recorder = Recorder::new(quote_client, sheets_client);
    let report = recorder.record().await?;

    report.into_result()
}

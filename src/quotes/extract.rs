//! One extractor per source page, each a plain `(html) -> value` function so
//! an upstream markup change breaks exactly one fixture test.

use crate::error::{AppError, Result};
use rust_decimal::Decimal;
use scraper::{Html, Selector};

const DOLLAR_SELECTOR: &str = "#cc-ratebox";
const DOLLAR_LABEL: &str = "ARS/USD = ";
const CRYPTO_SELECTOR: &str = "#quote_price span";
const CRYPTO_SUFFIX: &str = "USD";

/// ARS/USD rate. The ratebox text reads `ARS/USD = 36,05 ...`; drop the
/// label, keep the first 5 characters, and normalize the decimal separator.
pub fn dollar_rate(html: &str) -> Result<String> {
    let text = select_text(html, DOLLAR_SELECTOR, "dollar")?;

    let value: String = text.replace(DOLLAR_LABEL, "").chars().take(5).collect();
    let value = value.replace(',', ".");

    validated("dollar", value)
}

/// Bitcoin price in USD, e.g. `9001.40 USD` with the suffix stripped.
pub fn bitcoin_quote(html: &str) -> Result<String> {
    quote_price(html, "bitcoin")
}

/// Ethereum price in USD, same page layout as the bitcoin source.
pub fn ethereum_quote(html: &str) -> Result<String> {
    quote_price(html, "ethereum")
}

fn quote_price(html: &str, label: &str) -> Result<String> {
    let text = select_text(html, CRYPTO_SELECTOR, label)?;

    let value = text.replace(CRYPTO_SUFFIX, "").trim().to_string();

    validated(label, value)
}

/// Concatenated text of every element matching `selector`, erroring when the
/// page has none.
fn select_text(html: &str, selector: &str, label: &str) -> Result<String> {
    let selector = Selector::parse(selector)
        .map_err(|e| AppError::Scrape(format!("Invalid selector for {}: {}", label, e)))?;

    let document = Html::parse_document(html);
    let mut matched = document.select(&selector).peekable();

    if matched.peek().is_none() {
        return Err(AppError::Scrape(format!(
            "No element matched the {} selector",
            label
        )));
    }

    Ok(matched
        .flat_map(|element| element.text())
        .collect::<String>())
}

/// Reject values that would land in the sheet as garbage. The original
/// string is returned untouched so the sheet still receives exactly what the
/// page showed; commas are stripped only for the parse check since the
/// crypto pages render thousands separators.
fn validated(label: &str, value: String) -> Result<String> {
    if value.replace(',', "").parse::<Decimal>().is_err() {
        return Err(AppError::Scrape(format!(
            "Extracted {} value {:?} is not numeric",
            label, value
        )));
    }

    Ok(value)
}

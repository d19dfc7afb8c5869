use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use url::Url;

const CONFIG_DIR_PREFIX: &str = "quote-tracker";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub google: GoogleConfig,
    pub sheet: SheetConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Append target: the spreadsheet and the A1 range that receives new rows.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub range: String,
}

/// Pages the three quotes are scraped from.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SourcesConfig {
    pub dollar_url: String,
    pub bitcoin_url: String,
    pub ethereum_url: String,
}

impl SourcesConfig {
    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("sources.dollar_url", &self.dollar_url),
            ("sources.bitcoin_url", &self.bitcoin_url),
            ("sources.ethereum_url", &self.ethereum_url),
        ] {
            if url.is_empty() {
                return Err(AppError::Config(format!(
                    "{} must be set in config file",
                    name
                )));
            }
            Url::parse(url)
                .map_err(|e| AppError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }

        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Fail fast on anything missing so a broken config never gets as far as
    /// a network call.
    fn validate(&self) -> Result<()> {
        if self.google.client_id.is_empty() || self.google.client_secret.is_empty() {
            return Err(AppError::Config(
                "Google client_id and client_secret must be set in config file".to_string(),
            ));
        }

        if self.sheet.spreadsheet_id.is_empty() {
            return Err(AppError::Config(
                "sheet.spreadsheet_id must be set in config file".to_string(),
            ));
        }

        if self.sheet.range.is_empty() {
            return Err(AppError::Config(
                "sheet.range must be set in config file".to_string(),
            ));
        }

        self.sources.validate()
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get the cache directory path
    pub fn cache_dir() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_cache_home()
            .ok_or_else(|| AppError::Config("Failed to determine cache directory".to_string()))
    }

    /// Get a cache file path
    pub fn cache_file(filename: &str) -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.place_cache_file(filename)
            .map_err(|e| AppError::Config(format!("Failed to create cache file path: {}", e)))
    }
}

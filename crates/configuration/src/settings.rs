use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub market: Market,
    pub logging: Logging,
}

/// Which instrument to analyse and where its price history lives.
#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    /// The ticker symbol (e.g., "^NSEI").
    pub symbol: String,
    /// The first day of the price history.
    pub start_date: NaiveDate,
    /// The last day of the price history. Today when omitted.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Directory holding one `<symbol>.csv` price file per instrument.
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily-rotated file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.symbol.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "market.symbol must not be empty".to_string(),
            ));
        }

        if let Some(end_date) = self.market.end_date {
            if end_date < self.market.start_date {
                return Err(ConfigError::ValidationError(format!(
                    "market.end_date ({end_date}) is before market.start_date ({})",
                    self.market.start_date
                )));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

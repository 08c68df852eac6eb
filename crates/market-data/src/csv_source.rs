use chrono::NaiveDate;
use core_types::{PricePoint, PriceSeries};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::PriceSource;
use crate::error::MarketDataError;

/// Reads daily closes from `<data_dir>/<symbol>.csv`.
///
/// The file needs a `Date` and a `Close` column (matched case-insensitively);
/// any other columns, such as `Open` or `Volume`, are ignored. Rows with an
/// empty or `null` close are skipped.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    data_dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The file a symbol is stored in. Index tickers lose their `^` prefix
    /// and anything unsafe in a file name becomes `_`.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        let name: String = symbol
            .trim_start_matches('^')
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.data_dir.join(format!("{name}.csv"))
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<PriceSeries, MarketDataError> {
        let path = self.path_for(symbol);
        let file = File::open(&path).map_err(|source| MarketDataError::Io {
            path: path.clone(),
            source,
        })?;

        let series = read_prices(file, &path)?.between(from, to);
        tracing::info!(
            %symbol,
            path = %path.display(),
            points = series.len(),
            "Loaded price history."
        );
        Ok(series)
    }
}

/// Parses a price CSV into a series. `origin` is only used in error messages.
pub fn read_prices<R: Read>(reader: R, origin: &Path) -> Result<PriceSeries, MarketDataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| MarketDataError::MissingColumn(origin.to_path_buf(), name))
    };
    let date_idx = column("date")?;
    let close_idx = column("close")?;

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let close_cell = record.get(close_idx).unwrap_or_default();
        if close_cell.is_empty() || close_cell.eq_ignore_ascii_case("null") {
            skipped += 1;
            continue;
        }

        let date_cell = record.get(date_idx).unwrap_or_default();
        let timestamp = parse_date(date_cell).ok_or_else(|| MarketDataError::Parse {
            line,
            message: format!("'{date_cell}' is not a date"),
        })?;
        let close = Decimal::from_str(close_cell)
            .or_else(|_| Decimal::from_scientific(close_cell))
            .map_err(|e| MarketDataError::Parse {
                line,
                message: format!("'{close_cell}' is not a price: {e}"),
            })?;

        points.push(PricePoint::new(timestamp, close));
    }

    if skipped > 0 {
        tracing::warn!(path = %origin.display(), skipped, "Skipped rows without a close price.");
    }

    Ok(PriceSeries::new(points)?)
}

/// Accepts `2024-01-02` as well as timestamps such as `2024-01-02 00:00:00+05:30`.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let day = cell.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

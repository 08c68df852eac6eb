use chrono::NaiveDate;
use core_types::PriceSeries;

pub mod csv_source;
pub mod error;

// --- Public API ---
pub use csv_source::CsvPriceSource;
pub use error::MarketDataError;

/// The abstract interface for anything that can supply a daily price history.
///
/// This trait is the contract the application uses, allowing a local file,
/// a fixed series or a remote download to be swapped in.
pub trait PriceSource {
    /// Fetches the daily closes of `symbol` within `[from, to]`.
    fn fetch(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<PriceSeries, MarketDataError>;
}

/// A source backed by a series already held in memory. The symbol is ignored.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    series: PriceSeries,
}

impl InMemoryPriceSource {
    pub fn new(series: PriceSeries) -> Self {
        Self { series }
    }
}

impl PriceSource for InMemoryPriceSource {
    fn fetch(&self, _symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<PriceSeries, MarketDataError> {
        Ok(self.series.between(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PricePoint;
    use rust_decimal_macros::dec;

    #[test]
    fn in_memory_source_applies_range() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let series = PriceSeries::new(vec![
            PricePoint::new(day(2), dec!(100)),
            PricePoint::new(day(3), dec!(101)),
            PricePoint::new(day(4), dec!(102)),
        ])
        .unwrap();

        let fetched = InMemoryPriceSource::new(series).fetch("ANY", day(3), day(10)).unwrap();

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched.first().unwrap().close, dec!(101));
    }
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::enums::Period;
use crate::error::CoreError;

/// A single daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDate,
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDate, close: Decimal) -> Self {
        Self { timestamp, close }
    }
}

/// An immutable, date-ordered sequence of closing prices with unique dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from unordered points.
    ///
    /// Points are sorted by date. Duplicate dates and non-positive closes are
    /// rejected, since a zero close would make the following return undefined.
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self, CoreError> {
        points.sort_by_key(|p| p.timestamp);

        if let Some(w) = points.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(CoreError::InvalidInput(
                "price series".to_string(),
                format!("duplicate timestamp {}", w[0].timestamp),
            ));
        }

        if let Some(p) = points.iter().find(|p| p.close <= Decimal::ZERO) {
            return Err(CoreError::InvalidInput(
                "price series".to_string(),
                format!("non-positive close {} on {}", p.close, p.timestamp),
            ));
        }

        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The sub-series starting at `from` (inclusive).
    pub fn since(&self, from: NaiveDate) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.timestamp >= from)
                .copied()
                .collect(),
        }
    }

    /// The sub-series within `[from, to]`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.timestamp >= from && p.timestamp <= to)
                .copied()
                .collect(),
        }
    }
}

/// Arithmetic mean that reports overflow instead of panicking.
///
/// Returns `Ok(None)` for an empty slice.
pub fn checked_mean(values: &[Decimal]) -> Result<Option<Decimal>, CoreError> {
    if values.is_empty() {
        return Ok(None);
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| CoreError::Calculation(format!("sum of {} values overflowed", values.len())))?;
    Ok(Some(sum / Decimal::from(values.len())))
}

/// The return of one period, stamped with the date of the period's last close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub period_end: NaiveDate,
    pub ratio: Decimal,
}

impl ReturnPoint {
    pub fn new(period_end: NaiveDate, ratio: Decimal) -> Self {
        Self { period_end, ratio }
    }
}

/// Period-over-period returns at a single granularity, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub period: Period,
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(period: Period, points: Vec<ReturnPoint>) -> Self {
        Self { period, points }
    }

    pub fn empty(period: Period) -> Self {
        Self::new(period, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReturnPoint> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&ReturnPoint> {
        self.points.last()
    }

    pub fn ratios(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.ratio).collect()
    }

    /// Arithmetic mean of all ratios, `None` when the series is empty.
    pub fn mean(&self) -> Result<Option<Decimal>, CoreError> {
        checked_mean(&self.ratios())
    }

    /// Returns keyed by their period label (`"2024"`, `"2024-03"`).
    pub fn labelled(&self) -> BTreeMap<String, Decimal> {
        self.points
            .iter()
            .map(|p| (self.period.label(p.period_end), p.ratio))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn price_series_is_sorted_on_construction() {
        let series = PriceSeries::new(vec![
            PricePoint::new(date(2021, 1, 4), dec!(110)),
            PricePoint::new(date(2020, 1, 2), dec!(100)),
        ])
        .unwrap();

        assert_eq!(series.first().unwrap().timestamp, date(2020, 1, 2));
        assert_eq!(series.last().unwrap().close, dec!(110));
    }

    #[test]
    fn price_series_rejects_duplicate_dates() {
        let result = PriceSeries::new(vec![
            PricePoint::new(date(2020, 1, 2), dec!(100)),
            PricePoint::new(date(2020, 1, 2), dec!(101)),
        ]);
        assert!(matches!(result, Err(CoreError::InvalidInput(_, _))));
    }

    #[test]
    fn price_series_rejects_non_positive_close() {
        let result = PriceSeries::new(vec![PricePoint::new(date(2020, 1, 2), dec!(0))]);
        assert!(result.is_err());
    }

    #[test]
    fn since_and_between_slice_by_date() {
        let series = PriceSeries::new(vec![
            PricePoint::new(date(2022, 12, 30), dec!(90)),
            PricePoint::new(date(2023, 1, 2), dec!(100)),
            PricePoint::new(date(2023, 6, 1), dec!(105)),
        ])
        .unwrap();

        assert_eq!(series.since(date(2023, 1, 1)).len(), 2);
        assert_eq!(series.between(date(2022, 1, 1), date(2023, 1, 2)).len(), 2);
        assert!(series.since(date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn return_series_mean_and_labels() {
        let returns = ReturnSeries::new(
            Period::Monthly,
            vec![
                ReturnPoint::new(date(2024, 2, 29), dec!(0.02)),
                ReturnPoint::new(date(2024, 3, 28), dec!(-0.01)),
            ],
        );

        assert_eq!(returns.mean().unwrap(), Some(dec!(0.005)));
        let labels = returns.labelled();
        assert_eq!(labels.get("2024-03"), Some(&dec!(-0.01)));
        assert_eq!(ReturnSeries::empty(Period::Yearly).mean().unwrap(), None);
    }

    #[test]
    fn mean_reports_overflow() {
        let result = checked_mean(&[Decimal::MAX, Decimal::ONE]);
        assert!(matches!(result, Err(CoreError::Calculation(_))));
        assert_eq!(checked_mean(&[dec!(1), dec!(2)]).unwrap(), Some(dec!(1.5)));
    }

    #[test]
    fn return_series_serializes_period_lowercase() {
        let returns = ReturnSeries::empty(Period::Yearly);
        let json = serde_json::to_string(&returns).unwrap();
        assert!(json.contains("\"yearly\""));
    }
}

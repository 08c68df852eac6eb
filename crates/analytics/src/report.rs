use core_types::ReturnSeries;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Empirical behaviour of the years that followed a below-average year.
///
/// Every probability and expectation is zero when there is nothing to
/// divide by (no below-average years, or no follow-up samples).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub average_annual_return: Decimal,
    pub below_average_year_count: usize,

    pub probability_next_year_exceeds_average: Decimal,
    pub probability_next_two_years_exceed_average: Decimal,

    // Mean reversion expectations
    pub expected_next_year_return_given_below_average: Decimal,
    pub expected_next_two_year_return_given_below_average: Decimal,
}

impl StatisticsResult {
    /// Creates a new, zeroed-out StatisticsResult.
    pub fn new() -> Self {
        Self {
            average_annual_return: Decimal::ZERO,
            below_average_year_count: 0,
            probability_next_year_exceeds_average: Decimal::ZERO,
            probability_next_two_years_exceed_average: Decimal::ZERO,
            expected_next_year_return_given_below_average: Decimal::ZERO,
            expected_next_two_year_return_given_below_average: Decimal::ZERO,
        }
    }
}

impl Default for StatisticsResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a single refresh produces, handed as one value to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub annual_returns: ReturnSeries,
    pub statistics: StatisticsResult,
    /// Whether the most recent annual return is below the historical average.
    /// `None` when there is no annual return at all.
    pub recent_trend_below_average: Option<bool>,
    /// First-to-last close change within the current year.
    pub current_year_return: Option<Decimal>,
    pub monthly_returns: ReturnSeries,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Period;

    #[test]
    fn snapshot_serializes_to_json() {
        let snapshot = DashboardSnapshot {
            annual_returns: ReturnSeries::empty(Period::Yearly),
            statistics: StatisticsResult::new(),
            recent_trend_below_average: None,
            current_year_return: None,
            monthly_returns: ReturnSeries::empty(Period::Monthly),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["statistics"]["below_average_year_count"], 0);
        assert!(json["current_year_return"].is_null());
        assert_eq!(json["monthly_returns"]["period"], "monthly");
    }
}

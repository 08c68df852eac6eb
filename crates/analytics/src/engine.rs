use crate::error::AnalyticsError;
use crate::report::{DashboardSnapshot, StatisticsResult};
use core_types::{Period, PricePoint, PriceSeries, ReturnPoint, ReturnSeries, checked_mean};
use rust_decimal::Decimal;

/// Below-average years this close to the end of the history are not used as
/// conditioning samples.
const TRAILING_BELOW_AVERAGE_SKIPPED: usize = 2;

/// A stateless calculator for deriving return statistics from a price history.
#[derive(Debug, Default)]
pub struct ReturnStatisticsEngine {}

impl ReturnStatisticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every dashboard figure from scratch.
    ///
    /// # Arguments
    ///
    /// * `history` - The full daily price history.
    /// * `current_year` - The year-to-date subset of the same instrument.
    ///
    /// # Returns
    ///
    /// A `DashboardSnapshot`, or `AnalyticsError::EmptyInput` when `history`
    /// is empty. An empty `current_year` is not an error; the current-year
    /// figures are simply absent. Returns too large to sum within the
    /// Decimal range give `AnalyticsError::Calculation`.
    pub fn refresh(
        &self,
        history: &PriceSeries,
        current_year: &PriceSeries,
    ) -> Result<DashboardSnapshot, AnalyticsError> {
        let annual_returns = self.resample_to_period_returns(history, Period::Yearly)?;
        let statistics = self.compute_below_average_statistics(&annual_returns)?;

        let recent_trend_below_average = annual_returns
            .last()
            .map(|last| last.ratio < statistics.average_annual_return);

        let (current_year_return, monthly_returns) = if current_year.is_empty() {
            tracing::debug!("No current-year prices; skipping year-to-date figures.");
            (None, ReturnSeries::empty(Period::Monthly))
        } else {
            (
                self.current_year_return(current_year)?,
                self.resample_to_period_returns(current_year, Period::Monthly)?,
            )
        };

        tracing::info!(
            annual_periods = annual_returns.len(),
            monthly_periods = monthly_returns.len(),
            below_average_years = statistics.below_average_year_count,
            "Dashboard refresh complete."
        );

        Ok(DashboardSnapshot {
            annual_returns,
            statistics,
            recent_trend_below_average,
            current_year_return,
            monthly_returns,
        })
    }

    /// Resamples a daily series to calendar periods and computes the
    /// percentage change between consecutive period-end closes.
    ///
    /// The first period has no predecessor and produces no return, so the
    /// output holds one entry fewer than the number of distinct periods.
    pub fn resample_to_period_returns(
        &self,
        series: &PriceSeries,
        period: Period,
    ) -> Result<ReturnSeries, AnalyticsError> {
        if series.is_empty() {
            return Err(AnalyticsError::EmptyInput(format!(
                "no prices to resample to {period} returns"
            )));
        }

        // The series is date-ordered, so each period is a contiguous run.
        let mut period_closes: Vec<PricePoint> = Vec::new();
        for point in series.points() {
            match period_closes.last_mut() {
                Some(last) if period.key(last.timestamp) == period.key(point.timestamp) => {
                    *last = *point;
                }
                _ => period_closes.push(*point),
            }
        }

        let points = period_closes
            .windows(2)
            .map(|w| {
                pct_change(w[0].close, w[1].close).map(|ratio| ReturnPoint::new(w[1].timestamp, ratio))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            %period,
            prices = series.len(),
            periods = period_closes.len(),
            returns = points.len(),
            "Resampled price series."
        );

        Ok(ReturnSeries::new(period, points))
    }

    /// Derives the probability and expected size of a rebound after
    /// below-average years.
    ///
    /// Fails with `AnalyticsError::Calculation` only when a sum of returns
    /// exceeds the Decimal range.
    pub fn compute_below_average_statistics(
        &self,
        annual_returns: &ReturnSeries,
    ) -> Result<StatisticsResult, AnalyticsError> {
        let mut result = StatisticsResult::new();

        let Some(average) = annual_returns.mean()? else {
            return Ok(result);
        };
        result.average_annual_return = average;

        let ratios = annual_returns.ratios();
        let below_average: Vec<usize> = ratios
            .iter()
            .enumerate()
            .filter(|(_, ratio)| **ratio < average)
            .map(|(i, _)| i)
            .collect();
        result.below_average_year_count = below_average.len();

        if below_average.is_empty() {
            return Ok(result);
        }

        // The last two below-average years are skipped even when a follow-up
        // year exists for them. With that truncation every eligible year has
        // at least two later years, so the bound checks below never fail;
        // they only matter if the truncation is ever lowered.
        let eligible = &below_average[..below_average.len().saturating_sub(TRAILING_BELOW_AVERAGE_SKIPPED)];

        let mut next_year_samples = Vec::new();
        let mut next_two_year_samples = Vec::new();
        let mut exceed_next_year = 0usize;
        let mut exceed_next_two_years = 0usize;

        for &i in eligible {
            let Some(&next) = ratios.get(i + 1) else {
                continue;
            };
            next_year_samples.push(next);
            if next > average {
                exceed_next_year += 1;
            }

            if let Some(&after_next) = ratios.get(i + 2) {
                let two_year_mean = next
                    .checked_add(after_next)
                    .map(|sum| sum / Decimal::TWO)
                    .ok_or_else(|| {
                        AnalyticsError::Calculation(format!("two-year sum {next} + {after_next} overflowed"))
                    })?;
                next_two_year_samples.push(two_year_mean);
                if two_year_mean > average {
                    exceed_next_two_years += 1;
                }
            }
        }

        let denominator = Decimal::from(below_average.len());
        result.probability_next_year_exceeds_average = Decimal::from(exceed_next_year) / denominator;
        result.probability_next_two_years_exceed_average =
            Decimal::from(exceed_next_two_years) / denominator;

        result.expected_next_year_return_given_below_average =
            checked_mean(&next_year_samples)?.unwrap_or(Decimal::ZERO);
        result.expected_next_two_year_return_given_below_average =
            checked_mean(&next_two_year_samples)?.unwrap_or(Decimal::ZERO);

        tracing::debug!(
            %average,
            below_average = below_average.len(),
            eligible = eligible.len(),
            next_year_samples = next_year_samples.len(),
            next_two_year_samples = next_two_year_samples.len(),
            "Computed below-average statistics."
        );

        Ok(result)
    }

    /// First-to-last close change of a (year-to-date) series.
    fn current_year_return(&self, series: &PriceSeries) -> Result<Option<Decimal>, AnalyticsError> {
        match (series.first(), series.last()) {
            (Some(first), Some(last)) => pct_change(first.close, last.close).map(Some),
            _ => Ok(None),
        }
    }
}

fn pct_change(previous: Decimal, current: Decimal) -> Result<Decimal, AnalyticsError> {
    (current - previous)
        .checked_div(previous)
        .ok_or_else(|| AnalyticsError::Calculation(format!("percentage change from {previous} is undefined")))
}

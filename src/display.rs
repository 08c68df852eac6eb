use analytics::{DashboardSnapshot, StatisticsResult};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use core_types::ReturnSeries;
use rust_decimal::Decimal;

/// Formats a ratio as a percentage with two decimals, e.g. `0.1234` -> `12.34%`.
pub fn percent(ratio: Decimal) -> String {
    format!("{:.2}%", (ratio * Decimal::ONE_HUNDRED).round_dp(2))
}

/// One row per period: label and return.
pub fn returns_table(returns: &ReturnSeries, heading: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![heading.to_string(), "Return".to_string()]);

    for (label, ratio) in returns.labelled() {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(percent(ratio)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// The probability and mean reversion summary as plain text lines.
pub fn statistics_lines(stats: &StatisticsResult) -> Vec<String> {
    vec![
        format!("Average annual return: {}", percent(stats.average_annual_return)),
        format!("Below-average years: {}", stats.below_average_year_count),
        format!(
            "Probability next year beats the average after a below-average year: {}",
            percent(stats.probability_next_year_exceeds_average)
        ),
        format!(
            "Probability the next two years beat the average after a below-average year: {}",
            percent(stats.probability_next_two_years_exceed_average)
        ),
        format!(
            "Expected next-year return after a below-average year: {}",
            percent(stats.expected_next_year_return_given_below_average)
        ),
        format!(
            "Expected average return over the next two years after a below-average year: {}",
            percent(stats.expected_next_two_year_return_given_below_average)
        ),
    ]
}

/// The full text report of a refresh.
pub fn render_snapshot(symbol: &str, snapshot: &DashboardSnapshot) -> String {
    let mut out = Vec::new();

    out.push(format!("{symbol} market analysis"));
    out.push(String::new());
    out.push("Annual returns".to_string());
    out.push(returns_table(&snapshot.annual_returns, "Year").to_string());
    out.push(String::new());

    out.push("Current year monthly returns".to_string());
    out.push(returns_table(&snapshot.monthly_returns, "Month").to_string());
    match snapshot.current_year_return {
        Some(ratio) => out.push(format!("Year-to-date return: {}", percent(ratio))),
        None => out.push("Year-to-date return: no data".to_string()),
    }
    out.push(String::new());

    out.push("Probability analysis".to_string());
    out.extend(statistics_lines(&snapshot.statistics));
    if let Some(below) = snapshot.recent_trend_below_average {
        out.push(format!(
            "Latest year was {} the average.",
            if below { "below" } else { "at or above" }
        ));
    }

    out.join("\n")
}

/// What the user sees when no prices could be loaded: empty tables and a message.
pub fn render_load_error(symbol: &str, reason: &str) -> String {
    [
        format!("{symbol} market analysis"),
        String::new(),
        format!("Error loading data: {reason}"),
        returns_table(&ReturnSeries::empty(core_types::Period::Yearly), "Year").to_string(),
        returns_table(&ReturnSeries::empty(core_types::Period::Monthly), "Month").to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{Period, ReturnPoint};
    use rust_decimal_macros::dec;

    #[test]
    fn percent_rounds_to_two_places() {
        assert_eq!(percent(dec!(0.123456)), "12.35%");
        assert_eq!(percent(dec!(-0.05)), "-5.00%");
        assert_eq!(percent(Decimal::ZERO), "0.00%");
    }

    #[test]
    fn returns_table_lists_each_period() {
        let returns = ReturnSeries::new(
            Period::Yearly,
            vec![
                ReturnPoint::new(NaiveDate::from_ymd_opt(2022, 12, 30).unwrap(), dec!(0.043)),
                ReturnPoint::new(NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(), dec!(0.2)),
            ],
        );

        let rendered = returns_table(&returns, "Year").to_string();

        assert!(rendered.contains("2022"));
        assert!(rendered.contains("4.30%"));
        assert!(rendered.contains("20.00%"));
    }

    #[test]
    fn statistics_lines_cover_every_figure() {
        let lines = statistics_lines(&StatisticsResult {
            below_average_year_count: 3,
            probability_next_year_exceeds_average: dec!(0.5),
            ..StatisticsResult::new()
        });

        assert_eq!(lines.len(), 6);
        assert!(lines[1].ends_with('3'));
        assert!(lines[2].ends_with("50.00%"));
    }

    #[test]
    fn load_error_mentions_the_reason() {
        let rendered = render_load_error("^NSEI", "no prices");
        assert!(rendered.contains("Error loading data: no prices"));
        assert!(rendered.contains("Month"));
    }
}

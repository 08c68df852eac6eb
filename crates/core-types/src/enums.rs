use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The calendar granularity a price series is resampled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Yearly,
    Monthly,
}

impl Period {
    /// Returns the calendar bucket a date falls into.
    ///
    /// Yearly buckets use `0` as the month component so that keys of both
    /// granularities order the same way.
    pub fn key(&self, date: NaiveDate) -> (i32, u32) {
        match self {
            Period::Yearly => (date.year(), 0),
            Period::Monthly => (date.year(), date.month()),
        }
    }

    /// Formats the bucket of `date` for display, e.g. `2024` or `2024-03`.
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Period::Yearly => date.format("%Y").to_string(),
            Period::Monthly => date.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Yearly => write!(f, "yearly"),
            Period::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yearly" | "year" | "y" | "annual" => Ok(Period::Yearly),
            "monthly" | "month" | "m" => Ok(Period::Monthly),
            other => Err(CoreError::InvalidInput(
                "period".to_string(),
                format!("unknown granularity '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_group_by_calendar_bucket() {
        let jan = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        let dec = NaiveDate::from_ymd_opt(2023, 12, 29).unwrap();

        assert_eq!(Period::Yearly.key(jan), Period::Yearly.key(dec));
        assert_ne!(Period::Monthly.key(jan), Period::Monthly.key(dec));
        assert!(Period::Monthly.key(jan) < Period::Monthly.key(dec));
    }

    #[test]
    fn labels() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap();
        assert_eq!(Period::Yearly.label(date), "2024");
        assert_eq!(Period::Monthly.label(date), "2024-03");
    }

    #[test]
    fn parses_granularity_names() {
        assert_eq!("Yearly".parse::<Period>().unwrap(), Period::Yearly);
        assert_eq!(" m ".parse::<Period>().unwrap(), Period::Monthly);
        assert!("weekly".parse::<Period>().is_err());
    }
}

//! # Core Types
//!
//! The shared vocabulary of the workspace: daily closing prices, calendar
//! periods and the period returns derived from them. This crate has no
//! knowledge of where prices come from or how results are displayed.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Period;
pub use error::CoreError;
pub use structs::{checked_mean, PricePoint, PriceSeries, ReturnPoint, ReturnSeries};

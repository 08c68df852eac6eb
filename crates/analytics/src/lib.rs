//! # Return Statistics Engine
//!
//! This crate turns a daily closing-price history into period returns and a
//! small set of empirical "what happened after a below-average year"
//! statistics.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** This crate has no knowledge of where prices come from or
//!   how results are rendered. It depends only on `core-types`.
//! - **Stateless calculation:** The `ReturnStatisticsEngine` takes a price
//!   series as input and produces a `StatisticsResult` / `DashboardSnapshot`
//!   as output. Every call recomputes everything from scratch.
//!
//! ## Public API
//!
//! - `ReturnStatisticsEngine`: resampling, below-average statistics and `refresh`.
//! - `StatisticsResult`, `DashboardSnapshot`: the results handed to a presentation layer.
//! - `AnalyticsError`: the error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::ReturnStatisticsEngine;
pub use error::AnalyticsError;
pub use report::{DashboardSnapshot, StatisticsResult};

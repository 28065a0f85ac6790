//! # Core Types
//!
//! The leaf data of a financial model: the multi-year `FinancialDataset`, the
//! `SeriesField` enum naming its ten raw series, and the scenario assumptions
//! held in a `ScenarioBook`. Nothing in this crate computes derived values.

pub mod amount;
pub mod dataset;
pub mod enums;
pub mod error;
pub mod scenario;

// Re-export the core types to provide a clean public API.
pub use dataset::{DEFAULT_PERIODS, DEFAULT_START_YEAR, FinancialDataset};
pub use enums::SeriesField;
pub use error::CoreError;
pub use scenario::{ScenarioAssumption, ScenarioBook, ScenarioUpdate};

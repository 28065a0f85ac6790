//! # Financial Model Analytics
//!
//! This crate derives every statement line, ratio and scenario projection of a
//! financial model from its raw inputs.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** It has no knowledge of files, terminals or configuration
//!   sources. It depends only on `core-types` and the projection parameters
//!   defined in `configuration`.
//! - **Stateless Calculation:** `MetricsCalculator` and `ScenarioProjector` take
//!   the dataset (and a period index) explicitly and recompute on every call.
//!   Degenerate arithmetic never fails; zero denominators yield zero.
//!
//! ## Public API
//!
//! - `MetricsCalculator`: gross profit through net income, margins, balance check, ratios.
//! - `ScenarioProjector`: compound revenue growth and capped margin projections.
//! - `dashboard::summarize`: headline figures for one focus period.
//! - `PeriodMetrics`, `ScenarioProjection`, `DashboardSummary`: serializable results.

// Declare the modules that constitute this crate.
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod projector;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use dashboard::summarize;
pub use engine::{BALANCE_TOLERANCE, MetricsCalculator};
pub use error::AnalyticsError;
pub use projector::ScenarioProjector;
pub use report::{DashboardSummary, PeriodMetrics, ScenarioOutlook, ScenarioProjection};

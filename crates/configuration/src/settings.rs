use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing sections fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelSettings,
    pub projection: ProjectionSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

/// Shape of a newly created model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// The calendar year of the first period.
    pub start_year: i32,
    /// How many yearly periods a new model holds.
    pub periods: usize,
    /// Currency code written into exported metadata.
    pub currency: String,
}

/// Parameters for the scenario projector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Base revenue used when the first period's revenue is zero.
    pub default_base_revenue: Decimal,
    /// Base gross margin (percent) used when the first period's revenue is zero.
    pub default_base_margin_pct: Decimal,
    /// Upper bound on a projected margin, in percent.
    pub margin_cap_pct: Decimal,
    /// Number of projected periods reported per scenario.
    pub horizon: usize,
}

/// Target encoding of the `export` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

// --- Default Implementations ---

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            start_year: 2024,
            periods: 5,
            currency: "USD".to_string(),
        }
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            default_base_revenue: dec!(1000000),
            default_base_margin_pct: dec!(30),
            margin_cap_pct: dec!(100),
            horizon: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

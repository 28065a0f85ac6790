use crate::engine::MetricsCalculator;
use crate::error::AnalyticsError;
use crate::report::ScenarioProjection;
use configuration::ProjectionSettings;
use core_types::{FinancialDataset, ScenarioAssumption, ScenarioBook};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Projects scenarios forward from the first period of a dataset.
///
/// Only `revenue[0]` and `cogs[0]` are read; later periods of the dataset never
/// influence a projection. Nothing is written back to the dataset or to the
/// scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioProjector {
    settings: ProjectionSettings,
    calculator: MetricsCalculator,
}

impl ScenarioProjector {
    /// Creates a projector after checking that its fallback values are usable.
    pub fn new(settings: ProjectionSettings) -> Result<Self, AnalyticsError> {
        if settings.default_base_revenue <= dec!(0) {
            return Err(AnalyticsError::InvalidParameters(
                "default_base_revenue must be greater than 0".to_string(),
            ));
        }
        if settings.margin_cap_pct <= dec!(0) {
            return Err(AnalyticsError::InvalidParameters(
                "margin_cap_pct must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            settings,
            calculator: MetricsCalculator::new(),
        })
    }

    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    /// Revenue of the first period, or the configured fallback when it is zero or missing.
    pub fn base_revenue(&self, data: &FinancialDataset) -> Decimal {
        match data.revenue.first() {
            Some(revenue) if !revenue.is_zero() => *revenue,
            _ => self.settings.default_base_revenue,
        }
    }

    /// Gross margin of the first period, or the configured fallback when its revenue is zero.
    pub fn base_margin(&self, data: &FinancialDataset) -> Decimal {
        match data.revenue.first() {
            Some(revenue) if !revenue.is_zero() => self.calculator.gross_margin(data, 0),
            _ => self.settings.default_base_margin_pct,
        }
    }

    /// The per-period compounding factor `1 + growth / 100`.
    pub fn growth_factor(scenario: &ScenarioAssumption) -> Decimal {
        Decimal::ONE.saturating_add(scenario.revenue_growth / dec!(100))
    }

    /// Revenue `offset + 1` periods after the base period.
    ///
    /// Compounded by repeated multiplication, so each offset equals the previous
    /// one times the growth factor. Saturates at the decimal bounds.
    pub fn projected_revenue(&self, data: &FinancialDataset, scenario: &ScenarioAssumption, offset: usize) -> Decimal {
        let factor = Self::growth_factor(scenario);
        (0..=offset).fold(self.base_revenue(data), |revenue, _| revenue.saturating_mul(factor))
    }

    /// Projected revenues for offsets `0..horizon`.
    pub fn projected_revenues(&self, data: &FinancialDataset, scenario: &ScenarioAssumption, horizon: usize) -> Vec<Decimal> {
        let factor = Self::growth_factor(scenario);
        (0..horizon)
            .scan(self.base_revenue(data), |revenue, _| {
                *revenue = revenue.saturating_mul(factor);
                Some(*revenue)
            })
            .collect()
    }

    /// Base margin plus the scenario's improvement, capped but never floored.
    pub fn projected_margin(&self, data: &FinancialDataset, scenario: &ScenarioAssumption) -> Decimal {
        self.base_margin(data)
            .saturating_add(scenario.margin_improvement)
            .min(self.settings.margin_cap_pct)
    }

    /// Revenue of period `i` grown by one period at the scenario's rate.
    ///
    /// Unlike `projected_revenue` this uses the period's own revenue with no fallback.
    pub fn next_period_revenue(&self, data: &FinancialDataset, scenario: &ScenarioAssumption, i: usize) -> Decimal {
        data.revenue[i].saturating_mul(Self::growth_factor(scenario))
    }

    pub fn project(&self, data: &FinancialDataset, scenario: &ScenarioAssumption, horizon: usize) -> ScenarioProjection {
        let projection = ScenarioProjection {
            scenario_id: scenario.id.clone(),
            name: scenario.name.clone(),
            revenue_growth: scenario.revenue_growth,
            margin_improvement: scenario.margin_improvement,
            revenues: self.projected_revenues(data, scenario, horizon),
            margin: self.projected_margin(data, scenario),
        };

        tracing::debug!(
            scenario = %projection.name,
            margin = %projection.margin,
            horizon,
            "Projected scenario."
        );
        projection
    }

    /// Projects every scenario of the book over the configured horizon, in book order.
    pub fn project_all(&self, data: &FinancialDataset, book: &ScenarioBook) -> Vec<ScenarioProjection> {
        book.iter()
            .map(|scenario| self.project(data, scenario, self.settings.horizon))
            .collect()
    }
}

impl Default for ScenarioProjector {
    fn default() -> Self {
        Self {
            settings: ProjectionSettings::default(),
            calculator: MetricsCalculator::new(),
        }
    }
}

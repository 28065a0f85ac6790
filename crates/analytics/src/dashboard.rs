use crate::engine::MetricsCalculator;
use crate::projector::ScenarioProjector;
use crate::report::{DashboardSummary, ScenarioOutlook};
use chrono::{Datelike, Utc};
use core_types::{FinancialDataset, ScenarioBook};
use rust_decimal::Decimal;

/// Picks the period shown on the dashboard: the one labelled `year`, else the first.
pub fn focus_period(data: &FinancialDataset, year: i32) -> usize {
    data.period_of(year).unwrap_or(0)
}

/// Builds the dashboard headline figures.
///
/// `focus_year` defaults to the current calendar year. When the dataset has no
/// column for that year the first period is used.
pub fn summarize(
    data: &FinancialDataset,
    book: &ScenarioBook,
    projector: &ScenarioProjector,
    focus_year: Option<i32>,
) -> DashboardSummary {
    let calc = MetricsCalculator::new();
    let year = focus_year.unwrap_or_else(|| Utc::now().year());
    let i = focus_period(data, year);

    let revenue_growth = if i + 1 < data.periods() {
        calc.revenue_growth(data, i + 1)
    } else {
        Decimal::ZERO
    };

    let scenarios = book
        .iter()
        .map(|scenario| ScenarioOutlook {
            scenario_id: scenario.id.clone(),
            name: scenario.name.clone(),
            next_period_revenue: projector.next_period_revenue(data, scenario, i),
        })
        .collect();

    tracing::debug!(requested_year = year, focus_year = data.years[i], "Dashboard focus selected.");

    DashboardSummary {
        focus_year: data.years[i],
        focus_period: i,
        revenue_growth,
        gross_margin: calc.gross_margin(data, i),
        ebitda: calc.ebitda(data, i),
        net_income: calc.net_income(data, i),
        ebitda_margin: calc.ebitda_margin(data, i),
        net_margin: calc.net_margin(data, i),
        asset_to_liability_ratio: calc.asset_to_liability_ratio(data, i),
        scenarios,
    }
}

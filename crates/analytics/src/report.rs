use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every derived value of one period.
///
/// This struct is the data transfer object exporters read per period; it is
/// rebuilt from the dataset on every request and never stored back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMetrics {
    pub year: i32,

    // I. Income statement
    pub gross_profit: Decimal,
    pub ebitda: Decimal,
    pub ebit: Decimal,
    pub net_income: Decimal,

    // II. Margins, in percent of revenue
    pub gross_margin: Decimal,
    pub ebitda_margin: Decimal,
    pub net_margin: Decimal,

    // III. Balance sheet
    pub total_liabilities_equity: Decimal,
    pub balanced: bool,
    pub debt_to_equity: Decimal,
    pub asset_to_liability_ratio: Decimal,

    // IV. Period-over-period and cash flow
    pub revenue_growth: Decimal,
    pub cash_conversion: Decimal,
    pub cash_flow_share: Decimal,
}

/// A scenario run forward from the base period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProjection {
    pub scenario_id: String,
    pub name: String,
    pub revenue_growth: Decimal,
    pub margin_improvement: Decimal,
    /// `revenues[k]` is the projected revenue `k + 1` periods after the base period.
    pub revenues: Vec<Decimal>,
    pub margin: Decimal,
}

/// Next-period revenue of one scenario, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutlook {
    pub scenario_id: String,
    pub name: String,
    pub next_period_revenue: Decimal,
}

/// Headline figures for a single focus period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub focus_year: i32,
    pub focus_period: usize,
    /// Growth from the focus period into the following one; zero on the last period.
    pub revenue_growth: Decimal,
    pub gross_margin: Decimal,
    pub ebitda: Decimal,
    pub net_income: Decimal,
    pub ebitda_margin: Decimal,
    pub net_margin: Decimal,
    pub asset_to_liability_ratio: Decimal,
    pub scenarios: Vec<ScenarioOutlook>,
}

use crate::report::PeriodMetrics;
use core_types::{FinancialDataset, SeriesField};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Assets and liabilities plus equity closer than this are considered balanced.
pub const BALANCE_TOLERANCE: Decimal = dec!(0.01);

const HUNDRED: Decimal = dec!(100);

/// A stateless calculator for deriving statement lines and ratios from a dataset.
///
/// Every method takes the dataset and a period index explicitly and computes
/// its value from scratch; nothing is cached between calls. Divisions by zero
/// resolve to zero instead of failing, and sums and differences saturate at
/// the `Decimal` bounds.
///
/// Period indices must lie in `0..dataset.periods()`; an index outside that
/// range panics like slice indexing does.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsCalculator {}

impl MetricsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Income statement ---

    pub fn gross_profit(&self, data: &FinancialDataset, i: usize) -> Decimal {
        data.revenue[i].saturating_sub(data.cogs[i])
    }

    pub fn ebitda(&self, data: &FinancialDataset, i: usize) -> Decimal {
        self.gross_profit(data, i).saturating_sub(data.operating_expenses[i])
    }

    pub fn ebit(&self, data: &FinancialDataset, i: usize) -> Decimal {
        self.ebitda(data, i).saturating_sub(data.depreciation[i])
    }

    pub fn net_income(&self, data: &FinancialDataset, i: usize) -> Decimal {
        self.ebit(data, i)
            .saturating_sub(data.interest[i])
            .saturating_sub(data.taxes[i])
    }

    // --- Margins (percent of revenue) ---

    pub fn gross_margin(&self, data: &FinancialDataset, i: usize) -> Decimal {
        percent_of(self.gross_profit(data, i), data.revenue[i])
    }

    pub fn ebitda_margin(&self, data: &FinancialDataset, i: usize) -> Decimal {
        percent_of(self.ebitda(data, i), data.revenue[i])
    }

    pub fn net_margin(&self, data: &FinancialDataset, i: usize) -> Decimal {
        percent_of(self.net_income(data, i), data.revenue[i])
    }

    // --- Balance sheet ---

    pub fn total_liabilities_equity(&self, data: &FinancialDataset, i: usize) -> Decimal {
        data.liabilities[i].saturating_add(data.equity[i])
    }

    /// `true` when assets and liabilities plus equity differ by strictly less than a cent.
    ///
    /// A gap too large to represent is never balanced.
    pub fn balance_check(&self, data: &FinancialDataset, i: usize) -> bool {
        data.liabilities[i]
            .checked_add(data.equity[i])
            .and_then(|total| data.assets[i].checked_sub(total))
            .is_some_and(|gap| gap.abs() < BALANCE_TOLERANCE)
    }

    pub fn debt_to_equity(&self, data: &FinancialDataset, i: usize) -> Decimal {
        ratio(data.liabilities[i], data.equity[i])
    }

    pub fn asset_to_liability_ratio(&self, data: &FinancialDataset, i: usize) -> Decimal {
        ratio(data.assets[i], data.liabilities[i])
    }

    // --- Period-over-period ---

    /// Percentage change of `series` from period `i - 1` to `i`.
    ///
    /// Zero for the first period and whenever the previous value is zero.
    pub fn growth_rate(&self, series: &[Decimal], i: usize) -> Decimal {
        if i == 0 {
            return Decimal::ZERO;
        }
        let previous = series[i - 1];
        percent_of(series[i].saturating_sub(previous), previous)
    }

    pub fn revenue_growth(&self, data: &FinancialDataset, i: usize) -> Decimal {
        self.growth_rate(data.series(SeriesField::Revenue), i)
    }

    // --- Cash flow ---

    /// Operating cash flow as a percentage of net income.
    ///
    /// Zero whenever net income is zero or negative.
    pub fn cash_conversion(&self, data: &FinancialDataset, i: usize) -> Decimal {
        let net_income = self.net_income(data, i);
        if net_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        percent_of(data.cash_flow[i], net_income)
    }

    /// Cash flow of period `i` relative to the largest cash flow in the dataset, in percent.
    ///
    /// Zero when no period has a positive cash flow.
    pub fn cash_flow_share(&self, data: &FinancialDataset, i: usize) -> Decimal {
        let peak = data.cash_flow.iter().copied().max().unwrap_or(Decimal::ZERO);
        if peak <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        percent_of(data.cash_flow[i], peak)
    }

    // --- Bundles ---

    /// Computes every derived quantity for a single period.
    pub fn period(&self, data: &FinancialDataset, i: usize) -> PeriodMetrics {
        let metrics = PeriodMetrics {
            year: data.years[i],
            gross_profit: self.gross_profit(data, i),
            ebitda: self.ebitda(data, i),
            ebit: self.ebit(data, i),
            net_income: self.net_income(data, i),
            gross_margin: self.gross_margin(data, i),
            ebitda_margin: self.ebitda_margin(data, i),
            net_margin: self.net_margin(data, i),
            total_liabilities_equity: self.total_liabilities_equity(data, i),
            balanced: self.balance_check(data, i),
            debt_to_equity: self.debt_to_equity(data, i),
            asset_to_liability_ratio: self.asset_to_liability_ratio(data, i),
            revenue_growth: self.revenue_growth(data, i),
            cash_conversion: self.cash_conversion(data, i),
            cash_flow_share: self.cash_flow_share(data, i),
        };

        tracing::debug!(
            year = metrics.year,
            net_income = %metrics.net_income,
            balanced = metrics.balanced,
            "Derived period metrics."
        );
        metrics
    }

    /// Computes `period` for every period of the dataset, in year order.
    pub fn periods(&self, data: &FinancialDataset) -> Vec<PeriodMetrics> {
        (0..data.periods()).map(|i| self.period(data, i)).collect()
    }
}

/// `numerator / denominator`, or zero when the denominator is zero or the quotient overflows.
pub(crate) fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `numerator / denominator * 100` under the same zero policy as `ratio`.
pub(crate) fn percent_of(numerator: Decimal, denominator: Decimal) -> Decimal {
    ratio(numerator, denominator)
        .checked_mul(HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

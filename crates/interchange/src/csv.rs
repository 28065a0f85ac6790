//! Flat CSV export: one row per account, one column per year.

use crate::error::InterchangeError;
use analytics::MetricsCalculator;
use core_types::{FinancialDataset, SeriesField};
use csv::WriterBuilder;
use rust_decimal::Decimal;
use std::io::Write;

fn amounts(values: impl IntoIterator<Item = Decimal>) -> Vec<String> {
    values.into_iter().map(|v| v.normalize().to_string()).collect()
}

fn row(label: &str, cells: Vec<String>) -> Vec<String> {
    std::iter::once(label.to_string()).chain(cells).collect()
}

/// Builds the CSV rows, header included.
pub fn csv_rows(data: &FinancialDataset) -> Vec<Vec<String>> {
    let calc = MetricsCalculator::new();
    let raw = |field: SeriesField| amounts(data.series(field).iter().copied());
    let derived = |line: fn(&MetricsCalculator, &FinancialDataset, usize) -> Decimal| {
        amounts((0..data.periods()).map(|i| line(&calc, data, i)))
    };

    vec![
        row("Account", data.years.iter().map(|y| y.to_string()).collect()),
        row("Revenue", raw(SeriesField::Revenue)),
        row("Cost of Goods Sold", raw(SeriesField::Cogs)),
        row("Gross Profit", derived(MetricsCalculator::gross_profit)),
        row("Operating Expenses", raw(SeriesField::OperatingExpenses)),
        row("EBITDA", derived(MetricsCalculator::ebitda)),
        row("Depreciation & Amortization", raw(SeriesField::Depreciation)),
        row("EBIT", derived(MetricsCalculator::ebit)),
        row("Interest Expense", raw(SeriesField::Interest)),
        row("Taxes", raw(SeriesField::Taxes)),
        row("Net Income", derived(MetricsCalculator::net_income)),
        row("", vec![String::new(); data.periods()]),
        row("Assets", raw(SeriesField::Assets)),
        row("Liabilities", raw(SeriesField::Liabilities)),
        row("Equity", raw(SeriesField::Equity)),
        row("Cash Flow", raw(SeriesField::CashFlow)),
    ]
}

/// Writes the CSV export to `w`.
pub fn export_csv<W: Write>(w: W, data: &FinancialDataset) -> Result<(), InterchangeError> {
    let mut wrt = WriterBuilder::new().from_writer(w);
    for record in csv_rows(data) {
        wrt.write_record(&record)?;
    }
    wrt.flush()?;

    tracing::info!(periods = data.periods(), "Model exported as CSV.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rows_follow_the_statement_order() {
        let mut data = FinancialDataset::consecutive(2024, 2).unwrap();
        data.revenue = vec![dec!(1000), dec!(1200.50)];
        data.cogs = vec![dec!(400), dec!(500)];

        let rows = csv_rows(&data);
        assert_eq!(rows.len(), 16);
        assert_eq!(rows[0], vec!["Account", "2024", "2025"]);
        assert_eq!(rows[1], vec!["Revenue", "1000", "1200.5"]);
        assert_eq!(rows[3], vec!["Gross Profit", "600", "700.5"]);
        assert_eq!(rows[11], vec!["", "", ""]);
        assert_eq!(rows[15][0], "Cash Flow");
        assert!(rows.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn writes_comma_separated_lines() {
        let mut out = Vec::new();
        export_csv(&mut out, &FinancialDataset::consecutive(2024, 1).unwrap()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Account,2024"));
        assert_eq!(lines.next(), Some("Revenue,0"));
        // the ampersand label is written as is
        assert!(text.contains("Depreciation & Amortization,0"));
    }
}

use analytics::{MetricsCalculator, ScenarioProjector};
use core_types::{FinancialDataset, ScenarioBook, SeriesField};
use rust_decimal::Decimal;
use serde::Serialize;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Label(String),
    Year(i32),
    Number(Decimal),
}

impl Cell {
    pub fn label(text: impl Into<String>) -> Self {
        Cell::Label(text.into())
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// The five statement sheets of an exported workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
    Scenarios,
    KeyMetrics,
}

impl SheetKind {
    pub const ALL: [SheetKind; 5] = [
        SheetKind::IncomeStatement,
        SheetKind::BalanceSheet,
        SheetKind::CashFlow,
        SheetKind::Scenarios,
        SheetKind::KeyMetrics,
    ];

    /// The sheet (tab) name.
    pub fn name(&self) -> &'static str {
        match self {
            SheetKind::IncomeStatement => "Income Statement",
            SheetKind::BalanceSheet => "Balance Sheet",
            SheetKind::CashFlow => "Cash Flow",
            SheetKind::Scenarios => "Scenarios",
            SheetKind::KeyMetrics => "Key Metrics",
        }
    }
}

/// A named grid of cells. Rows may differ in length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Finds the first row whose leading cell is the given label.
    pub fn row(&self, label: &str) -> Option<&[Cell]> {
        self.rows
            .iter()
            .find(|row| matches!(row.first(), Some(Cell::Label(l)) if l == label))
            .map(Vec::as_slice)
    }
}

/// The statement layout handed to spreadsheet encoders and terminal renderers.
///
/// Only labels and values are produced here; encoding into a container format
/// is left to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn build(data: &FinancialDataset, book: &ScenarioBook, projector: &ScenarioProjector) -> Self {
        let builder = SheetBuilder {
            data,
            calc: MetricsCalculator::new(),
        };

        let sheets = SheetKind::ALL
            .into_iter()
            .map(|kind| match kind {
                SheetKind::IncomeStatement => builder.income_statement(),
                SheetKind::BalanceSheet => builder.balance_sheet(),
                SheetKind::CashFlow => builder.cash_flow(),
                SheetKind::Scenarios => builder.scenarios(book, projector),
                SheetKind::KeyMetrics => builder.key_metrics(),
            })
            .collect();

        Self { sheets }
    }

    pub fn sheet(&self, kind: SheetKind) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == kind.name())
    }
}

struct SheetBuilder<'a> {
    data: &'a FinancialDataset,
    calc: MetricsCalculator,
}

impl SheetBuilder<'_> {
    fn periods(&self) -> std::ops::Range<usize> {
        0..self.data.periods()
    }

    fn title(&self, title: &str) -> Vec<Cell> {
        let mut row = vec![Cell::label(title), Cell::Empty];
        row.extend(self.data.years.iter().map(|&y| Cell::Year(y)));
        row
    }

    fn blank(&self, label: Option<&str>) -> Vec<Cell> {
        let mut row = vec![label.map_or(Cell::Empty, Cell::label), Cell::Empty];
        row.extend(self.periods().map(|_| Cell::Empty));
        row
    }

    fn values(&self, label: &str, values: impl IntoIterator<Item = Decimal>) -> Vec<Cell> {
        let mut row = vec![Cell::label(label), Cell::Empty];
        row.extend(values.into_iter().map(Cell::Number));
        row
    }

    fn raw(&self, label: &str, field: SeriesField) -> Vec<Cell> {
        self.values(label, self.data.series(field).iter().copied())
    }

    fn derived(&self, label: &str, line: fn(&MetricsCalculator, &FinancialDataset, usize) -> Decimal) -> Vec<Cell> {
        self.values(label, self.periods().map(|i| line(&self.calc, self.data, i)))
    }

    fn income_statement(&self) -> Sheet {
        Sheet {
            name: SheetKind::IncomeStatement.name().to_string(),
            rows: vec![
                self.title("Income Statement"),
                self.blank(None),
                self.raw("Revenue", SeriesField::Revenue),
                self.raw("Cost of Goods Sold", SeriesField::Cogs),
                self.derived("Gross Profit", MetricsCalculator::gross_profit),
                self.raw("Operating Expenses", SeriesField::OperatingExpenses),
                self.derived("EBITDA", MetricsCalculator::ebitda),
                self.raw("Depreciation & Amortization", SeriesField::Depreciation),
                self.derived("EBIT", MetricsCalculator::ebit),
                self.raw("Interest Expense", SeriesField::Interest),
                self.raw("Taxes", SeriesField::Taxes),
                self.derived("Net Income", MetricsCalculator::net_income),
            ],
        }
    }

    fn balance_sheet(&self) -> Sheet {
        let mut check = vec![Cell::label("Balance Check"), Cell::Empty];
        check.extend(self.periods().map(|i| {
            Cell::label(if self.calc.balance_check(self.data, i) { "Balanced" } else { "Unbalanced" })
        }));

        Sheet {
            name: SheetKind::BalanceSheet.name().to_string(),
            rows: vec![
                self.title("Balance Sheet"),
                self.blank(None),
                self.blank(Some("ASSETS")),
                self.raw("Total Assets", SeriesField::Assets),
                self.blank(None),
                self.blank(Some("LIABILITIES & EQUITY")),
                self.raw("Total Liabilities", SeriesField::Liabilities),
                self.raw("Total Equity", SeriesField::Equity),
                self.derived("Total Liabilities & Equity", MetricsCalculator::total_liabilities_equity),
                self.blank(None),
                check,
            ],
        }
    }

    fn cash_flow(&self) -> Sheet {
        Sheet {
            name: SheetKind::CashFlow.name().to_string(),
            rows: vec![
                self.title("Cash Flow Statement"),
                self.blank(None),
                self.blank(Some("OPERATING ACTIVITIES")),
                self.derived("Net Income", MetricsCalculator::net_income),
                self.raw("Net Cash Flow from Operations", SeriesField::CashFlow),
                self.derived("Cash Conversion (%)", MetricsCalculator::cash_conversion),
            ],
        }
    }

    fn scenarios(&self, book: &ScenarioBook, projector: &ScenarioProjector) -> Sheet {
        let mut rows = vec![
            vec![Cell::label("Scenario Analysis"), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
            vec![Cell::Empty; 5],
            vec![
                Cell::label("Scenario Name"),
                Cell::label("Revenue Growth (%)"),
                Cell::label("Margin Improvement (%)"),
                Cell::label("Projected Margin (%)"),
                Cell::label("Projected Year 2 Revenue"),
            ],
        ];

        rows.extend(book.iter().map(|scenario| {
            vec![
                Cell::label(scenario.name.as_str()),
                Cell::Number(scenario.revenue_growth),
                Cell::Number(scenario.margin_improvement),
                Cell::Number(projector.projected_margin(self.data, scenario)),
                Cell::Number(projector.projected_revenue(self.data, scenario, 1)),
            ]
        }));

        Sheet {
            name: SheetKind::Scenarios.name().to_string(),
            rows,
        }
    }

    fn key_metrics(&self) -> Sheet {
        Sheet {
            name: SheetKind::KeyMetrics.name().to_string(),
            rows: vec![
                self.title("Key Financial Metrics"),
                self.blank(None),
                self.derived("Gross Margin (%)", MetricsCalculator::gross_margin),
                self.derived("EBITDA Margin (%)", MetricsCalculator::ebitda_margin),
                self.derived("Net Margin (%)", MetricsCalculator::net_margin),
                self.derived("Debt-to-Equity Ratio", MetricsCalculator::debt_to_equity),
                self.derived("Asset-to-Liability Ratio", MetricsCalculator::asset_to_liability_ratio),
                self.derived("Revenue Growth (%)", MetricsCalculator::revenue_growth),
                self.derived("Cash Conversion (%)", MetricsCalculator::cash_conversion),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dataset() -> FinancialDataset {
        let mut data = FinancialDataset::consecutive(2024, 2).unwrap();
        data.revenue = vec![dec!(1000000), dec!(1200000)];
        data.cogs = vec![dec!(600000), dec!(700000)];
        data.operating_expenses = vec![dec!(100000), dec!(100000)];
        data.assets = vec![dec!(500), dec!(500)];
        data.liabilities = vec![dec!(200), dec!(200)];
        data.equity = vec![dec!(300), dec!(250)];
        data.cash_flow = vec![dec!(150000), dec!(0)];
        data
    }

    fn numbers(row: &[Cell]) -> Vec<Decimal> {
        row.iter().filter_map(Cell::as_number).collect()
    }

    #[test]
    fn builds_all_five_sheets_in_order() {
        let workbook = Workbook::build(&dataset(), &ScenarioBook::default(), &ScenarioProjector::default());
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Income Statement", "Balance Sheet", "Cash Flow", "Scenarios", "Key Metrics"]);
    }

    #[test]
    fn income_statement_carries_derived_lines() {
        let workbook = Workbook::build(&dataset(), &ScenarioBook::default(), &ScenarioProjector::default());
        let sheet = workbook.sheet(SheetKind::IncomeStatement).unwrap();

        assert_eq!(
            sheet.rows[0],
            vec![Cell::label("Income Statement"), Cell::Empty, Cell::Year(2024), Cell::Year(2025)]
        );
        assert_eq!(numbers(sheet.row("Gross Profit").unwrap()), vec![dec!(400000), dec!(500000)]);
        assert_eq!(numbers(sheet.row("EBITDA").unwrap()), vec![dec!(300000), dec!(400000)]);
    }

    #[test]
    fn balance_sheet_flags_each_period() {
        let workbook = Workbook::build(&dataset(), &ScenarioBook::default(), &ScenarioProjector::default());
        let sheet = workbook.sheet(SheetKind::BalanceSheet).unwrap();
        let check = sheet.row("Balance Check").unwrap();

        assert_eq!(check[2], Cell::label("Balanced"));
        assert_eq!(check[3], Cell::label("Unbalanced"));
    }

    #[test]
    fn scenarios_sheet_reports_second_year_revenue() {
        let workbook = Workbook::build(&dataset(), &ScenarioBook::default(), &ScenarioProjector::default());
        let sheet = workbook.sheet(SheetKind::Scenarios).unwrap();
        let base_case = sheet.row("Base Case").unwrap();

        // 1,000,000 grown twice at 15 %
        assert_eq!(base_case[4], Cell::Number(dec!(1322500)));
        assert_eq!(base_case[3], Cell::Number(dec!(42)));
        assert_eq!(sheet.rows.len(), 3 + 3);
    }

    #[test]
    fn key_metrics_use_calculator_guards() {
        let mut data = dataset();
        data.equity = vec![dec!(0), dec!(250)];
        let workbook = Workbook::build(&data, &ScenarioBook::empty(), &ScenarioProjector::default());
        let sheet = workbook.sheet(SheetKind::KeyMetrics).unwrap();

        assert_eq!(numbers(sheet.row("Gross Margin (%)").unwrap()), vec![dec!(40), dec!(500000) / dec!(1200000) * dec!(100)]);
        assert_eq!(numbers(sheet.row("Debt-to-Equity Ratio").unwrap()), vec![dec!(0), dec!(0.8)]);
        assert_eq!(numbers(sheet.row("Revenue Growth (%)").unwrap()), vec![dec!(0), dec!(20)]);
    }
}

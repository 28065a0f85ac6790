use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// One of the ten raw per-period series held by a `FinancialDataset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesField {
    Revenue,
    Cogs,
    OperatingExpenses,
    Depreciation,
    Interest,
    Taxes,
    Assets,
    Liabilities,
    Equity,
    CashFlow,
}

impl SeriesField {
    /// Every series, in the order they appear in the statements.
    pub const ALL: [SeriesField; 10] = [
        SeriesField::Revenue,
        SeriesField::Cogs,
        SeriesField::OperatingExpenses,
        SeriesField::Depreciation,
        SeriesField::Interest,
        SeriesField::Taxes,
        SeriesField::Assets,
        SeriesField::Liabilities,
        SeriesField::Equity,
        SeriesField::CashFlow,
    ];

    /// The camelCase key used in the JSON document.
    pub fn key(&self) -> &'static str {
        match self {
            SeriesField::Revenue => "revenue",
            SeriesField::Cogs => "cogs",
            SeriesField::OperatingExpenses => "operatingExpenses",
            SeriesField::Depreciation => "depreciation",
            SeriesField::Interest => "interest",
            SeriesField::Taxes => "taxes",
            SeriesField::Assets => "assets",
            SeriesField::Liabilities => "liabilities",
            SeriesField::Equity => "equity",
            SeriesField::CashFlow => "cashFlow",
        }
    }

    /// Human-readable statement label.
    pub fn label(&self) -> &'static str {
        match self {
            SeriesField::Revenue => "Revenue",
            SeriesField::Cogs => "Cost of Goods Sold",
            SeriesField::OperatingExpenses => "Operating Expenses",
            SeriesField::Depreciation => "Depreciation & Amortization",
            SeriesField::Interest => "Interest Expense",
            SeriesField::Taxes => "Taxes",
            SeriesField::Assets => "Total Assets",
            SeriesField::Liabilities => "Total Liabilities",
            SeriesField::Equity => "Total Equity",
            SeriesField::CashFlow => "Net Cash Flow from Operations",
        }
    }
}

impl fmt::Display for SeriesField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SeriesField {
    type Err = CoreError;

    /// Accepts the camelCase key as well as kebab/snake spellings (`cash-flow`, `cash_flow`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        SeriesField::ALL
            .into_iter()
            .find(|field| field.key().to_ascii_lowercase() == normalized)
            .ok_or_else(|| CoreError::InvalidInput("series".to_string(), s.to_string()))
    }
}

//! Terminal rendering of workbook sheets and the dashboard.

use analytics::DashboardSummary;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use interchange::{Cell, Sheet};
use rust_decimal::Decimal;

/// Two decimals, trailing zeros kept so columns line up.
pub(crate) fn amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn percent(value: Decimal) -> String {
    format!("{}%", amount(value))
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Label(text) => text.clone(),
        Cell::Year(year) => year.to_string(),
        Cell::Number(value) => amount(*value),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Renders a sheet; its first row becomes the header.
pub(crate) fn sheet_table(sheet: &Sheet) -> Table {
    let mut table = new_table();
    let mut rows = sheet.rows.iter();

    if let Some(header) = rows.next() {
        table.set_header(header.iter().map(cell_text));
    }
    for row in rows {
        table.add_row(row.iter().map(|cell| {
            let aligned = comfy_table::Cell::new(cell_text(cell));
            if matches!(cell, Cell::Number(_)) {
                aligned.set_alignment(CellAlignment::Right)
            } else {
                aligned
            }
        }));
    }
    table
}

pub(crate) fn dashboard_table(summary: &DashboardSummary, currency: &str) -> Table {
    let mut table = new_table();
    table.set_header(vec![format!("Dashboard {}", summary.focus_year), String::new()]);

    let rows = [
        ("Revenue Growth", percent(summary.revenue_growth)),
        ("Gross Margin", percent(summary.gross_margin)),
        ("EBITDA", format!("{} {}", amount(summary.ebitda), currency)),
        ("EBITDA Margin", percent(summary.ebitda_margin)),
        ("Net Income", format!("{} {}", amount(summary.net_income), currency)),
        ("Net Margin", percent(summary.net_margin)),
        ("Asset / Liability", amount(summary.asset_to_liability_ratio)),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    for outlook in &summary.scenarios {
        table.add_row(vec![
            format!("{} (next year)", outlook.name),
            format!("{} {}", amount(outlook.next_period_revenue), currency),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_show_two_decimals() {
        assert_eq!(amount(dec!(1265000)), "1265000.00");
        assert_eq!(amount(dec!(-2.5)), "-2.50");
        assert_eq!(amount(dec!(33.3333)), "33.33");
    }

    #[test]
    fn sheet_header_comes_from_first_row() {
        let sheet = Sheet {
            name: "Income Statement".to_string(),
            rows: vec![
                vec![Cell::label("Income Statement"), Cell::Empty, Cell::Year(2024)],
                vec![Cell::label("Revenue"), Cell::Empty, Cell::Number(dec!(1000))],
            ],
        };

        let rendered = sheet_table(&sheet).to_string();
        assert!(rendered.contains("2024"));
        assert!(rendered.contains("Revenue"));
        assert!(rendered.contains("1000.00"));
    }
}

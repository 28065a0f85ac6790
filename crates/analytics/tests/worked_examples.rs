use analytics::{MetricsCalculator, ScenarioProjector};
use core_types::{FinancialDataset, ScenarioAssumption};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn with_first_period(revenue: Decimal, cogs: Decimal) -> FinancialDataset {
    let mut data = FinancialDataset::default();
    data.revenue[0] = revenue;
    data.cogs[0] = cogs;
    data
}

#[test]
fn base_case_growth_of_fifteen_percent() {
    let data = with_first_period(dec!(1000000), dec!(600000));
    let scenario = ScenarioAssumption::new("1", "Base Case", dec!(15), dec!(2));
    let projector = ScenarioProjector::default();

    assert_eq!(projector.projected_revenue(&data, &scenario, 0), dec!(1150000));
    let fifth = projector.projected_revenue(&data, &scenario, 4);
    assert_eq!(fifth.round(), dec!(2011357));
    assert_eq!(projector.projected_margin(&data, &scenario), dec!(42));
}

#[test]
fn zero_revenue_uses_defaults_and_zero_margin() {
    let data = with_first_period(dec!(0), dec!(0));
    let scenario = ScenarioAssumption::new("1", "Flat", dec!(0), dec!(0));
    let projector = ScenarioProjector::default();
    let calc = MetricsCalculator::new();

    assert_eq!(projector.base_revenue(&data), dec!(1000000));
    assert_eq!(projector.projected_revenue(&data, &scenario, 0), dec!(1000000));
    assert_eq!(calc.gross_margin(&data, 0), Decimal::ZERO);
}

#[test]
fn balanced_sheet_passes_the_check() {
    let mut data = FinancialDataset::default();
    data.assets[0] = dec!(5000000);
    data.liabilities[0] = dec!(2000000);
    data.equity[0] = dec!(3000000);

    assert!(MetricsCalculator::new().balance_check(&data, 0));
}

#[test]
fn unbalanced_sheet_fails_the_check() {
    let mut data = FinancialDataset::default();
    data.assets[0] = dec!(5000000);
    data.liabilities[0] = dec!(2000000);
    data.equity[0] = dec!(2900000);

    assert!(!MetricsCalculator::new().balance_check(&data, 0));
}

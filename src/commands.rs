use crate::render;
use crate::{Commands, DashboardArgs, ExportArgs, InitArgs, ModelArgs, ScenarioCommand, SetArgs, SheetChoice, ShowArgs};
use analytics::{MetricsCalculator, ScenarioProjector, summarize};
use anyhow::{Context, Result, bail};
use configuration::{Config, ExportFormat};
use core_types::{FinancialDataset, ScenarioBook, ScenarioUpdate};
use interchange::{Metadata, ModelDocument, SheetKind, Workbook};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Dispatches a parsed subcommand, writing user-facing output to stdout.
pub(crate) fn run(command: Commands, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Init(args) => init(&args, config, &mut out),
        Commands::Set(args) => set(&args, config, &mut out),
        Commands::Scenario(cmd) => scenario(cmd, config, &mut out),
        Commands::Show(args) => show(&args, config, &mut out),
        Commands::Dashboard(args) => dashboard(&args, config, &mut out),
        Commands::Export(args) => export(&args, config, &mut out),
        Commands::Validate(args) => validate(&args, &mut out),
    }
}

// ==============================================================================
// Model file helpers
// ==============================================================================

fn load_model(path: &Path) -> Result<ModelDocument> {
    let file = File::open(path).with_context(|| format!("Failed to open model file {}", path.display()))?;
    let document = interchange::import_json(BufReader::new(file))
        .with_context(|| format!("Failed to import model file {}", path.display()))?;
    Ok(document)
}

fn save_model(path: &Path, document: &ModelDocument, config: &Config) -> Result<()> {
    let metadata = document
        .metadata
        .clone()
        .unwrap_or_else(|| Metadata::with_currency(&config.model.currency));
    let file = File::create(path).with_context(|| format!("Failed to create model file {}", path.display()))?;
    interchange::write_json(BufWriter::new(file), &document.financial_data, &document.scenarios, metadata)?;
    tracing::debug!(path = %path.display(), "Model saved.");
    Ok(())
}

fn projector(config: &Config) -> Result<ScenarioProjector> {
    ScenarioProjector::new(config.projection.clone()).context("Invalid projection settings")
}

// ==============================================================================
// Handlers
// ==============================================================================

fn init(args: &InitArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.output.display());
    }

    let start_year = args.start_year.unwrap_or(config.model.start_year);
    let periods = args.periods.unwrap_or(config.model.periods);
    let data = FinancialDataset::consecutive(start_year, periods)?;
    let document = ModelDocument::new(data, ScenarioBook::default(), Metadata::with_currency(&config.model.currency));

    save_model(&args.output, &document, config)?;
    writeln!(
        out,
        "Created {} covering {}-{}.",
        args.output.display(),
        start_year,
        document.financial_data.years.last().copied().unwrap_or(start_year)
    )?;
    Ok(())
}

fn set(args: &SetArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let mut document = load_model(&args.target.model)?;
    let data = &mut document.financial_data;

    let Some(period) = data.period_of(args.year) else {
        bail!("{} has no column for {}", args.target.model.display(), args.year);
    };
    data.set_value(args.field, period, args.value)?;

    save_model(&args.target.model, &document, config)?;
    writeln!(out, "{} {} = {}", args.field.label(), args.year, args.value)?;
    Ok(())
}

fn scenario(cmd: ScenarioCommand, config: &Config, out: &mut impl Write) -> Result<()> {
    match cmd {
        ScenarioCommand::Add { target, name, growth, margin } => {
            let mut document = load_model(&target.model)?;
            let id = document.scenarios.add(&name, growth, margin)?.id.clone();
            save_model(&target.model, &document, config)?;
            writeln!(out, "Added scenario {id}")?;
        }
        ScenarioCommand::Update { target, id, name, growth, margin } => {
            let mut document = load_model(&target.model)?;
            let update = ScenarioUpdate {
                name,
                revenue_growth: growth,
                margin_improvement: margin,
            };
            document.scenarios.update(&id, update)?;
            save_model(&target.model, &document, config)?;
            writeln!(out, "Updated scenario {id}")?;
        }
        ScenarioCommand::Remove { target, id } => {
            let mut document = load_model(&target.model)?;
            let removed = document.scenarios.remove(&id)?;
            save_model(&target.model, &document, config)?;
            writeln!(out, "Removed scenario {} ({})", removed.id, removed.name)?;
        }
    }
    Ok(())
}

fn show(args: &ShowArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let document = load_model(&args.target.model)?;
    let data = &document.financial_data;

    if args.json {
        let metrics = MetricsCalculator::new().periods(data);
        writeln!(out, "{}", serde_json::to_string_pretty(&metrics)?)?;
        return Ok(());
    }

    let kinds: &[SheetKind] = match args.sheet {
        SheetChoice::Income => &[SheetKind::IncomeStatement],
        SheetChoice::Balance => &[SheetKind::BalanceSheet],
        SheetChoice::CashFlow => &[SheetKind::CashFlow],
        SheetChoice::Scenarios => &[SheetKind::Scenarios],
        SheetChoice::Metrics => &[SheetKind::KeyMetrics],
        SheetChoice::All => &SheetKind::ALL,
    };

    let workbook = Workbook::build(data, &document.scenarios, &projector(config)?);
    for sheet in kinds.iter().filter_map(|&kind| workbook.sheet(kind)) {
        writeln!(out, "{}", sheet.name)?;
        writeln!(out, "{}", render::sheet_table(sheet))?;
    }
    Ok(())
}

fn dashboard(args: &DashboardArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let document = load_model(&args.target.model)?;
    let summary = summarize(&document.financial_data, &document.scenarios, &projector(config)?, args.year);

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        let currency = document
            .metadata
            .as_ref()
            .map_or(config.model.currency.as_str(), |m| m.currency.as_str());
        writeln!(out, "{}", render::dashboard_table(&summary, currency))?;
    }
    Ok(())
}

fn export(args: &ExportArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let document = load_model(&args.target.model)?;
    let format = args.format.unwrap_or(config.export.format);

    let mut sink: Box<dyn Write + '_> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(&mut *out),
    };

    match format {
        ExportFormat::Json => {
            let metadata = document
                .metadata
                .clone()
                .unwrap_or_else(|| Metadata::with_currency(&config.model.currency));
            interchange::write_json(&mut sink, &document.financial_data, &document.scenarios, metadata)?;
        }
        ExportFormat::Csv => interchange::export_csv(&mut sink, &document.financial_data)?,
    }
    sink.flush()?;
    drop(sink);

    if let Some(path) = &args.output {
        writeln!(out, "Exported {format:?} to {}", path.display())?;
    }
    Ok(())
}

fn validate(args: &ModelArgs, out: &mut impl Write) -> Result<()> {
    let document = load_model(&args.model)?;
    let data = &document.financial_data;
    let calc = MetricsCalculator::new();

    let unbalanced: Vec<i32> = (0..data.periods())
        .filter(|&i| !calc.balance_check(data, i))
        .map(|i| data.years[i])
        .collect();

    writeln!(
        out,
        "{} is valid: {} periods, {} scenarios.",
        args.model.display(),
        data.periods(),
        document.scenarios.len()
    )?;
    if !unbalanced.is_empty() {
        tracing::warn!(years = ?unbalanced, "Balance sheet does not balance.");
        writeln!(out, "Balance sheet does not balance in: {unbalanced:?}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SeriesField;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn init_model(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("model.json");
        let args = InitArgs {
            output: path.clone(),
            start_year: Some(2024),
            periods: Some(3),
            force: false,
        };
        init(&args, &Config::default(), &mut Vec::new()).unwrap();
        path
    }

    fn target(path: &Path) -> ModelArgs {
        ModelArgs { model: path.to_path_buf() }
    }

    #[test]
    fn init_writes_a_blank_model_and_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);

        let document = load_model(&path).unwrap();
        assert_eq!(document.financial_data.years, vec![2024, 2025, 2026]);
        assert_eq!(document.scenarios.len(), 3);

        let again = InitArgs {
            output: path,
            start_year: None,
            periods: None,
            force: false,
        };
        assert!(init(&again, &Config::default(), &mut Vec::new()).is_err());
    }

    #[test]
    fn set_updates_one_cell() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);

        let args = SetArgs {
            target: target(&path),
            field: SeriesField::Revenue,
            year: 2025,
            value: dec!(1250000.5),
        };
        set(&args, &Config::default(), &mut Vec::new()).unwrap();

        let data = load_model(&path).unwrap().financial_data;
        assert_eq!(data.revenue, vec![dec!(0), dec!(1250000.5), dec!(0)]);
    }

    #[test]
    fn set_rejects_unknown_year() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);

        let args = SetArgs {
            target: target(&path),
            field: SeriesField::Taxes,
            year: 2030,
            value: dec!(1),
        };
        assert!(set(&args, &Config::default(), &mut Vec::new()).is_err());
    }

    #[test]
    fn scenarios_can_be_added_updated_and_removed() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);
        let config = Config::default();

        let add = ScenarioCommand::Add {
            target: target(&path),
            name: "  Downturn ".to_string(),
            growth: dec!(-10),
            margin: dec!(-3),
        };
        scenario(add, &config, &mut Vec::new()).unwrap();

        let book = load_model(&path).unwrap().scenarios;
        let added = book.as_slice().last().unwrap().clone();
        assert_eq!(book.len(), 4);
        assert_eq!(added.name, "Downturn");

        let update = ScenarioCommand::Update {
            target: target(&path),
            id: added.id.clone(),
            name: None,
            growth: Some(dec!(-5)),
            margin: None,
        };
        scenario(update, &config, &mut Vec::new()).unwrap();
        let updated = load_model(&path).unwrap().scenarios.get(&added.id).cloned().unwrap();
        assert_eq!(updated.revenue_growth, dec!(-5));
        assert_eq!(updated.margin_improvement, dec!(-3));

        let remove = ScenarioCommand::Remove {
            target: target(&path),
            id: added.id,
        };
        scenario(remove, &config, &mut Vec::new()).unwrap();
        assert_eq!(load_model(&path).unwrap().scenarios.len(), 3);
    }

    #[test]
    fn removing_an_unknown_scenario_fails() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);

        let remove = ScenarioCommand::Remove {
            target: target(&path),
            id: "missing".to_string(),
        };
        assert!(scenario(remove, &Config::default(), &mut Vec::new()).is_err());
    }

    #[test]
    fn show_renders_every_sheet() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);

        let mut out = Vec::new();
        let args = ShowArgs {
            target: target(&path),
            sheet: SheetChoice::All,
            json: false,
        };
        show(&args, &Config::default(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        for kind in SheetKind::ALL {
            assert!(text.contains(kind.name()), "missing {}", kind.name());
        }
    }

    #[test]
    fn dashboard_json_names_the_focus_year() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);

        let mut out = Vec::new();
        let args = DashboardArgs {
            target: target(&path),
            year: Some(2025),
            json: true,
        };
        dashboard(&args, &Config::default(), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["focusYear"], 2025);
        assert_eq!(value["focusPeriod"], 1);
        assert_eq!(value["scenarios"][0]["nextPeriodRevenue"], 0.0);
    }

    #[test]
    fn export_csv_to_a_file() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);
        let output = dir.path().join("model.csv");

        let args = ExportArgs {
            target: target(&path),
            format: Some(ExportFormat::Csv),
            output: Some(output.clone()),
        };
        export(&args, &Config::default(), &mut Vec::new()).unwrap();

        let text = std::fs::read_to_string(output).unwrap();
        assert!(text.starts_with("Account,2024,2025,2026"));
    }

    #[test]
    fn export_json_to_stdout_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);

        let mut out = Vec::new();
        let args = ExportArgs {
            target: target(&path),
            format: None,
            output: None,
        };
        export(&args, &Config::default(), &mut out).unwrap();

        let document = interchange::import_json(out.as_slice()).unwrap();
        assert_eq!(document.financial_data, load_model(&path).unwrap().financial_data);
    }

    #[test]
    fn edits_keep_every_digit() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);

        let args = SetArgs {
            target: target(&path),
            field: SeriesField::CashFlow,
            year: 2024,
            value: dec!(1234567890.123456789),
        };
        set(&args, &Config::default(), &mut Vec::new()).unwrap();

        // a later edit rewrites the file without losing the first one
        let args = SetArgs {
            target: target(&path),
            field: SeriesField::Taxes,
            year: 2026,
            value: dec!(0.1),
        };
        set(&args, &Config::default(), &mut Vec::new()).unwrap();

        let data = load_model(&path).unwrap().financial_data;
        assert_eq!(data.cash_flow[0], dec!(1234567890.123456789));
        assert_eq!(data.taxes[2], dec!(0.1));
    }

    #[test]
    fn extreme_values_render_without_panicking() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);
        let config = Config::default();

        for (field, value) in [
            (SeriesField::Revenue, dec!(70000000000000000000000000000)),
            (SeriesField::Cogs, dec!(-70000000000000000000000000000)),
            (SeriesField::Liabilities, Decimal::MAX),
            (SeriesField::Equity, Decimal::MAX),
        ] {
            let args = SetArgs {
                target: target(&path),
                field,
                year: 2024,
                value,
            };
            set(&args, &config, &mut Vec::new()).unwrap();
        }

        let show_args = ShowArgs {
            target: target(&path),
            sheet: SheetChoice::All,
            json: false,
        };
        show(&show_args, &config, &mut Vec::new()).unwrap();

        let dashboard_args = DashboardArgs {
            target: target(&path),
            year: Some(2024),
            json: true,
        };
        dashboard(&dashboard_args, &config, &mut Vec::new()).unwrap();

        let export_args = ExportArgs {
            target: target(&path),
            format: Some(ExportFormat::Csv),
            output: None,
        };
        let mut out = Vec::new();
        export(&export_args, &config, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Gross Profit,79228162514264337593543950335"));

        let data = load_model(&path).unwrap().financial_data;
        assert_eq!(data.equity[0], Decimal::MAX);
    }

    #[test]
    fn init_rejects_years_past_the_calendar_range() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs {
            output: dir.path().join("model.json"),
            start_year: Some(i32::MAX),
            periods: Some(2),
            force: false,
        };

        assert!(init(&args, &Config::default(), &mut Vec::new()).is_err());
        assert!(!args.output.exists());
    }

    #[test]
    fn validate_reports_unbalanced_years() {
        let dir = TempDir::new().unwrap();
        let path = init_model(&dir);
        let args = SetArgs {
            target: target(&path),
            field: SeriesField::Assets,
            year: 2026,
            value: dec!(100),
        };
        set(&args, &Config::default(), &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        validate(&target(&path), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("3 periods, 3 scenarios"));
        assert!(text.contains("[2026]"));
    }

    #[test]
    fn validate_rejects_broken_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{ "financialData": {} }"#).unwrap();

        assert!(validate(&target(&path), &mut Vec::new()).is_err());
    }
}

use crate::error::InterchangeError;
use chrono::{SecondsFormat, Utc};
use core_types::{FinancialDataset, ScenarioBook, SeriesField};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{Read, Write};

/// Keys every `financialData` object must carry as a non-empty array.
pub const REQUIRED_FIELDS: [&str; 11] = [
    "revenue",
    "cogs",
    "operatingExpenses",
    "depreciation",
    "interest",
    "taxes",
    "assets",
    "liabilities",
    "equity",
    "cashFlow",
    "years",
];

/// Descriptive block written next to the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub version: String,
    pub description: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
}

impl Metadata {
    pub fn with_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            ..Self::default()
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            description: "Financial Model Export".to_string(),
            currency: "USD".to_string(),
            export_date: None,
        }
    }
}

/// The JSON file a model is saved to and loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    pub financial_data: FinancialDataset,
    pub scenarios: ScenarioBook,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ModelDocument {
    pub fn new(financial_data: FinancialDataset, scenarios: ScenarioBook, metadata: Metadata) -> Self {
        Self {
            export_date: None,
            financial_data,
            scenarios,
            metadata: Some(metadata),
        }
    }
}

/// Serializes the model as pretty-printed JSON, stamped with the current time.
pub fn export_json(
    data: &FinancialDataset,
    scenarios: &ScenarioBook,
    metadata: Metadata,
) -> Result<String, InterchangeError> {
    let mut document = ModelDocument::new(data.clone(), scenarios.clone(), metadata);
    document.export_date = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    let json = serde_json::to_string_pretty(&document)?;
    tracing::info!(periods = data.periods(), scenarios = scenarios.len(), "Model exported as JSON.");
    Ok(json)
}

/// Writes `export_json` output to `w`.
pub fn write_json<W: Write>(
    mut w: W,
    data: &FinancialDataset,
    scenarios: &ScenarioBook,
    metadata: Metadata,
) -> Result<(), InterchangeError> {
    let json = export_json(data, scenarios, metadata)?;
    w.write_all(json.as_bytes())?;
    w.flush()?;
    Ok(())
}

/// Reads and validates a model document.
///
/// Either the whole document is accepted or an error is returned; callers keep
/// their current state on error.
pub fn import_json<R: Read>(r: R) -> Result<ModelDocument, InterchangeError> {
    let value: Value = serde_json::from_reader(r)?;
    from_value(value)
}

pub fn import_json_str(s: &str) -> Result<ModelDocument, InterchangeError> {
    let value: Value = serde_json::from_str(s)?;
    from_value(value)
}

fn from_value(value: Value) -> Result<ModelDocument, InterchangeError> {
    if let Err(err) = check_shape(&value) {
        tracing::warn!(error = %err, "Rejected model import.");
        return Err(err);
    }

    let document: ModelDocument =
        serde_json::from_value(value).map_err(|e| InterchangeError::Format(e.to_string()))?;
    document.financial_data.validate()?;

    tracing::info!(
        periods = document.financial_data.periods(),
        scenarios = document.scenarios.len(),
        "Model imported."
    );
    Ok(document)
}

/// Structural checks with messages that name the offending field.
fn check_shape(value: &Value) -> Result<(), InterchangeError> {
    let (Some(financial), Some(scenarios)) = (value.get("financialData"), value.get("scenarios")) else {
        return Err(InterchangeError::Format("Missing required data".to_string()));
    };

    for field in REQUIRED_FIELDS {
        match financial.get(field) {
            Some(Value::Array(items)) if !items.is_empty() => {
                if let Some(bad) = items.iter().find(|item| !item.is_number()) {
                    return Err(InterchangeError::Format(format!(
                        "{field} must contain only numbers, found {bad}"
                    )));
                }
            }
            Some(Value::Array(_)) => {
                return Err(InterchangeError::Format(format!("{field} data is empty")));
            }
            Some(_) => {
                return Err(InterchangeError::Format(format!("{field} data is not a list")));
            }
            None => return Err(InterchangeError::Format(format!("Missing {field} data"))),
        }
    }

    let Value::Array(scenarios) = scenarios else {
        return Err(InterchangeError::Format("scenarios is not a list".to_string()));
    };
    for (position, scenario) in scenarios.iter().enumerate() {
        let well_formed = scenario.get("id").is_some_and(Value::is_string)
            && scenario.get("name").is_some_and(Value::is_string)
            && scenario.get("revenueGrowth").is_some_and(Value::is_number)
            && scenario.get("marginImprovement").is_some_and(Value::is_number);
        if !well_formed {
            return Err(InterchangeError::Format(format!(
                "scenario #{} needs a string id and name and numeric revenueGrowth and marginImprovement",
                position + 1
            )));
        }
    }

    Ok(())
}

// The required keys and the series enum must stay in step.
const _: () = assert!(REQUIRED_FIELDS.len() == SeriesField::ALL.len() + 1);

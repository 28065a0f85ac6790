use crate::amount;
use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named pair of growth and margin assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAssumption {
    pub id: String,
    pub name: String,
    /// Per-period compounding revenue growth, in percent. May be negative.
    #[serde(deserialize_with = "amount::amount")]
    pub revenue_growth: Decimal,
    /// Percentage points added to the base gross margin.
    #[serde(deserialize_with = "amount::amount")]
    pub margin_improvement: Decimal,
}

impl ScenarioAssumption {
    pub fn new(id: impl Into<String>, name: impl Into<String>, revenue_growth: Decimal, margin_improvement: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            revenue_growth,
            margin_improvement,
        }
    }
}

/// A partial edit of a scenario. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioUpdate {
    pub name: Option<String>,
    pub revenue_growth: Option<Decimal>,
    pub margin_improvement: Option<Decimal>,
}

/// The ordered collection of scenarios a model carries.
///
/// Insertion order is display order. Scenarios are addressed by id for
/// updates and removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioBook {
    scenarios: Vec<ScenarioAssumption>,
}

impl ScenarioBook {
    /// An empty book.
    pub fn empty() -> Self {
        Self { scenarios: Vec::new() }
    }

    pub fn from_scenarios(scenarios: Vec<ScenarioAssumption>) -> Self {
        Self { scenarios }
    }

    /// Adds a new scenario with a freshly generated id.
    ///
    /// The name is trimmed and must not be empty.
    pub fn add(
        &mut self,
        name: &str,
        revenue_growth: Decimal,
        margin_improvement: Decimal,
    ) -> Result<&ScenarioAssumption, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput(
                "scenario name".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let scenario = ScenarioAssumption::new(Uuid::new_v4().to_string(), name, revenue_growth, margin_improvement);
        tracing::info!(id = %scenario.id, name = %scenario.name, "Scenario added.");
        self.scenarios.push(scenario);

        let added = self.scenarios.len() - 1;
        Ok(&self.scenarios[added])
    }

    /// Applies the provided fields of `update` to the scenario with `id`.
    pub fn update(&mut self, id: &str, update: ScenarioUpdate) -> Result<&ScenarioAssumption, CoreError> {
        let scenario = self
            .scenarios
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::ScenarioNotFound(id.to_string()))?;

        if let Some(name) = update.name {
            scenario.name = name;
        }
        if let Some(growth) = update.revenue_growth {
            scenario.revenue_growth = growth;
        }
        if let Some(improvement) = update.margin_improvement {
            scenario.margin_improvement = improvement;
        }

        tracing::info!(id = %scenario.id, "Scenario updated.");
        Ok(scenario)
    }

    /// Removes and returns the scenario with `id`.
    pub fn remove(&mut self, id: &str) -> Result<ScenarioAssumption, CoreError> {
        let position = self
            .scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::ScenarioNotFound(id.to_string()))?;

        tracing::info!(id, "Scenario removed.");
        Ok(self.scenarios.remove(position))
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioAssumption> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioAssumption> {
        self.scenarios.iter()
    }

    pub fn as_slice(&self) -> &[ScenarioAssumption] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// The three starter scenarios a new model ships with.
impl Default for ScenarioBook {
    fn default() -> Self {
        Self::from_scenarios(vec![
            ScenarioAssumption::new("1", "Base Case", dec!(15), dec!(2)),
            ScenarioAssumption::new("2", "Optimistic", dec!(25), dec!(5)),
            ScenarioAssumption::new("3", "Conservative", dec!(8), dec!(0)),
        ])
    }
}

impl<'a> IntoIterator for &'a ScenarioBook {
    type Item = &'a ScenarioAssumption;
    type IntoIter = std::slice::Iter<'a, ScenarioAssumption>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}

use crate::amount;
use crate::enums::SeriesField;
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The number of periods a freshly created model holds.
pub const DEFAULT_PERIODS: usize = 5;

/// The first calendar year of a freshly created model.
pub const DEFAULT_START_YEAR: i32 = 2024;

/// The multi-year raw inputs of a financial model.
///
/// Every series is index-aligned to `years`: `revenue[i]` is the revenue of
/// `years[i]`. The dataset never stores derived values; those are recomputed
/// by the analytics crate on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDataset {
    #[serde(deserialize_with = "amount::series")]
    pub revenue: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub cogs: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub operating_expenses: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub depreciation: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub interest: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub taxes: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub assets: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub liabilities: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub equity: Vec<Decimal>,
    #[serde(deserialize_with = "amount::series")]
    pub cash_flow: Vec<Decimal>,
    pub years: Vec<i32>,
}

impl FinancialDataset {
    /// Creates an all-zero dataset covering the given years.
    pub fn with_years(years: Vec<i32>) -> Result<Self, CoreError> {
        let dataset = Self::zeroed(years);
        dataset.validate()?;
        Ok(dataset)
    }

    fn zeroed(years: Vec<i32>) -> Self {
        let zeros = vec![Decimal::ZERO; years.len()];
        Self {
            revenue: zeros.clone(),
            cogs: zeros.clone(),
            operating_expenses: zeros.clone(),
            depreciation: zeros.clone(),
            interest: zeros.clone(),
            taxes: zeros.clone(),
            assets: zeros.clone(),
            liabilities: zeros.clone(),
            equity: zeros.clone(),
            cash_flow: zeros,
            years,
        }
    }

    /// Creates an all-zero dataset of `periods` consecutive years starting at `start_year`.
    pub fn consecutive(start_year: i32, periods: usize) -> Result<Self, CoreError> {
        let years = (0..periods)
            .map(|offset| {
                i32::try_from(offset)
                    .ok()
                    .and_then(|offset| start_year.checked_add(offset))
                    .ok_or_else(|| {
                        CoreError::InvalidInput(
                            "years".to_string(),
                            format!("{periods} periods starting at {start_year} run past the last representable year"),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_years(years)
    }

    /// The number of periods (N).
    pub fn periods(&self) -> usize {
        self.years.len()
    }

    /// Returns the series backing `field`.
    pub fn series(&self, field: SeriesField) -> &[Decimal] {
        match field {
            SeriesField::Revenue => &self.revenue,
            SeriesField::Cogs => &self.cogs,
            SeriesField::OperatingExpenses => &self.operating_expenses,
            SeriesField::Depreciation => &self.depreciation,
            SeriesField::Interest => &self.interest,
            SeriesField::Taxes => &self.taxes,
            SeriesField::Assets => &self.assets,
            SeriesField::Liabilities => &self.liabilities,
            SeriesField::Equity => &self.equity,
            SeriesField::CashFlow => &self.cash_flow,
        }
    }

    fn series_mut(&mut self, field: SeriesField) -> &mut Vec<Decimal> {
        match field {
            SeriesField::Revenue => &mut self.revenue,
            SeriesField::Cogs => &mut self.cogs,
            SeriesField::OperatingExpenses => &mut self.operating_expenses,
            SeriesField::Depreciation => &mut self.depreciation,
            SeriesField::Interest => &mut self.interest,
            SeriesField::Taxes => &mut self.taxes,
            SeriesField::Assets => &mut self.assets,
            SeriesField::Liabilities => &mut self.liabilities,
            SeriesField::Equity => &mut self.equity,
            SeriesField::CashFlow => &mut self.cash_flow,
        }
    }

    /// Reads a single value.
    ///
    /// # Panics
    ///
    /// Panics if `period` is not below `self.periods()`.
    pub fn value(&self, field: SeriesField, period: usize) -> Decimal {
        self.series(field)[period]
    }

    /// Maps a calendar year to its period index.
    pub fn period_of(&self, year: i32) -> Option<usize> {
        self.years.iter().position(|&y| y == year)
    }

    /// Returns a new dataset in which only `field[period]` differs from `self`.
    pub fn with_value(&self, field: SeriesField, period: usize, value: Decimal) -> Result<Self, CoreError> {
        let mut next = self.clone();
        next.set_value(field, period, value)?;
        Ok(next)
    }

    /// Replaces `field` with a new series where only `period` holds `value`.
    pub fn set_value(&mut self, field: SeriesField, period: usize, value: Decimal) -> Result<(), CoreError> {
        let periods = self.periods();
        if period >= periods {
            return Err(CoreError::PeriodOutOfRange { index: period, periods });
        }

        let replaced: Vec<Decimal> = self
            .series(field)
            .iter()
            .enumerate()
            .map(|(idx, &current)| if idx == period { value } else { current })
            .collect();
        *self.series_mut(field) = replaced;

        tracing::debug!(field = %field, period, %value, "Dataset value replaced.");
        Ok(())
    }

    /// Checks the structural invariants every consumer relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        let periods = self.periods();
        if periods == 0 {
            return Err(CoreError::InvalidDataset("years must contain at least one period".to_string()));
        }

        if let Some(pair) = self.years.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CoreError::InvalidDataset(format!(
                "years must be strictly increasing ({} is followed by {})",
                pair[0], pair[1]
            )));
        }

        for field in SeriesField::ALL {
            let len = self.series(field).len();
            if len != periods {
                return Err(CoreError::InvalidDataset(format!(
                    "{} has {} values but there are {} years",
                    field.key(),
                    len,
                    periods
                )));
            }
        }

        Ok(())
    }
}

impl Default for FinancialDataset {
    fn default() -> Self {
        Self::zeroed(
            (0..DEFAULT_PERIODS)
                .map(|offset| DEFAULT_START_YEAR + offset as i32)
                .collect(),
        )
    }
}

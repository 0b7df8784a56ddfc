//! Preparing raw tabular data for correlation.
//!
//! A [`Preprocessor`] turns a [`RawTable`] with possibly empty cells into
//! ready-to-evaluate [`ContinuousDataVector`]s, one per row:
//!
//! 1. impute empty cells ([`MissingDataPolicy`])
//! 2. clip large values ([`ClippingPolicy`])
//! 3. scale every value ([`ScalingType`]), with the log epsilon derived from
//!    the whole table
//! 4. build row vectors carrying positional cost hints
//! 5. normalise columns ([`NormaliseType`]) and refresh statistics

pub mod clip;
pub mod impute;
pub mod normalise;
pub mod scale;

pub use clip::ClippingPolicy;
pub use impute::MissingDataPolicy;
pub use normalise::{NormaliseType, Normaliser};
pub use scale::{scale_value, scaling_epsilon, ScalingType};

use crate::error::{CorrelationError, Result};
use crate::vector::{continuous_rows, ContinuousDataVector};
use serde::{Deserialize, Serialize};

/// Rectangular block of numeric cells, row-major. `None` marks an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    values: Vec<Option<f64>>,
    num_columns: usize,
    num_rows: usize,
}

impl RawTable {
    /// # Errors
    ///
    /// [`CorrelationError::TableShape`] if `values` does not hold exactly
    /// `num_rows × num_columns` cells.
    pub fn new(values: Vec<Option<f64>>, num_columns: usize, num_rows: usize) -> Result<Self> {
        let expected = num_columns * num_rows;
        if values.len() != expected {
            return Err(CorrelationError::TableShape {
                expected,
                actual: values.len(),
                num_rows,
                num_columns,
            });
        }

        Ok(Self {
            values,
            num_columns,
            num_rows,
        })
    }

    /// Table without empty cells.
    pub fn from_dense(values: &[f64], num_columns: usize, num_rows: usize) -> Result<Self> {
        Self::new(values.iter().copied().map(Some).collect(), num_columns, num_rows)
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn value_at(&self, column: usize, row: usize) -> Option<f64> {
        self.values[row * self.num_columns + column]
    }

    /// Number of empty cells.
    pub fn num_missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Preprocessing options, persisted alongside [`CorrelationParameters`](crate::config::CorrelationParameters).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub missing: MissingDataPolicy,
    pub clipping: ClippingPolicy,
    pub scaling: ScalingType,
    pub normalisation: NormaliseType,
}

impl PreprocessConfig {
    #[must_use]
    pub fn with_missing(mut self, missing: MissingDataPolicy) -> Self {
        self.missing = missing;
        self
    }

    #[must_use]
    pub fn with_clipping(mut self, clipping: ClippingPolicy) -> Self {
        self.clipping = clipping;
        self
    }

    #[must_use]
    pub fn with_scaling(mut self, scaling: ScalingType) -> Self {
        self.scaling = scaling;
        self
    }

    #[must_use]
    pub fn with_normalisation(mut self, normalisation: NormaliseType) -> Self {
        self.normalisation = normalisation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.clipping.validate()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Row-major values after imputation, clipping and scaling.
    pub fn transform(&self, table: &RawTable) -> Result<Vec<f64>> {
        self.config.validate()?;

        let mut values = impute::impute(table, self.config.missing);
        clip::clip(&mut values, table.num_columns(), self.config.clipping);
        scale::scale(&mut values, self.config.scaling);

        tracing::debug!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            missing = table.num_missing(),
            scaling = ?self.config.scaling,
            "transformed raw table"
        );

        Ok(values)
    }

    /// Up-to-date row vectors, normalised.
    ///
    /// # Errors
    ///
    /// [`CorrelationError::InvalidParameter`] for an invalid clipping policy.
    pub fn process(&self, table: &RawTable) -> Result<Vec<ContinuousDataVector>> {
        let values = self.transform(table)?;
        let mut vectors = continuous_rows(&values, table.num_columns());

        self.config.normalisation.apply(&mut vectors);
        tracing::debug!(
            vectors = vectors.len(),
            normalisation = ?self.config.normalisation,
            "built row vectors"
        );

        Ok(vectors)
    }
}

//! Dataset extraction for fits.
//!
//! Turns a columnar [`Table`] into the `(values, weights)` pair the likelihood
//! works on. The weight column is optional by design: simulation samples often
//! carry per-event weights while toy samples do not, so a missing weight
//! column falls back to ones instead of failing.

mod sample;
mod table;

pub use sample::{exponential_table, gaussian_table, merged_table};
pub use table::Table;

use tracing::debug;

use crate::error::Result;

/// Observable values and per-event weights, equal length.
///
/// Built once per fit invocation; never persisted.
#[derive(Debug, Clone)]
pub struct WeightedDataset {
    pub values: Vec<f64>,
    pub weights: Vec<f64>,
}

impl WeightedDataset {
    /// Extract `observable` and `weight_column` from `table`.
    ///
    /// If the weight column is absent, weights default to 1 for every event;
    /// the table is left untouched either way. A missing observable column is
    /// an error.
    pub fn from_table(table: &Table, observable: &str, weight_column: &str) -> Result<Self> {
        let values = table.column(observable)?.to_vec();

        let weights = if table.has_column(weight_column) {
            debug!(column = weight_column, "weights column found");
            table.column(weight_column)?.to_vec()
        } else {
            debug!(
                column = weight_column,
                "weights column not found, defaulting to ones"
            );
            table.constant_column(1.0)
        };

        Ok(Self { values, weights })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of event weights (effective sample size for plotting scales).
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}

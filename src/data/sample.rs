//! Synthetic event-table generation.
//!
//! Seeded generators for Gaussian (signal-like) and exponential
//! (background-like) mass columns. Used by the demo pipeline and the tests;
//! everything is deterministic for a given seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Exp, Normal};

use crate::data::Table;
use crate::error::{Error, Result};

/// Gaussian-distributed observable column, truncated to `[lo, hi]` by
/// rejection so every event lies inside the fit window.
pub fn gaussian_table(
    column: &str,
    mean: f64,
    sigma: f64,
    lo: f64,
    hi: f64,
    n: usize,
    seed: u64,
) -> Result<Table> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(Error::MissingData(format!(
            "invalid sigma {sigma} for synthetic gaussian sample"
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, sigma)
        .map_err(|e| Error::MissingData(format!("sample distribution error: {e}")))?;

    let mut values = Vec::with_capacity(n);
    while values.len() < n {
        let x = normal.sample(&mut rng);
        if x >= lo && x <= hi {
            values.push(x);
        }
    }

    Table::from_columns([(column.to_string(), values)])
}

/// Exponentially falling observable column `lo + Exp(rate)`, truncated to
/// `[lo, hi]` by rejection.
pub fn exponential_table(
    column: &str,
    rate: f64,
    lo: f64,
    hi: f64,
    n: usize,
    seed: u64,
) -> Result<Table> {
    let exp = Exp::new(rate)
        .map_err(|e| Error::MissingData(format!("sample distribution error: {e}")))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut values = Vec::with_capacity(n);
    while values.len() < n {
        let x = lo + exp.sample(&mut rng);
        if x <= hi {
            values.push(x);
        }
    }

    Table::from_columns([(column.to_string(), values)])
}

/// Concatenate the shared observable column of two tables (e.g. signal +
/// background into a pseudo-data sample).
pub fn merged_table(column: &str, a: &Table, b: &Table) -> Result<Table> {
    let mut values = a.column(column)?.to_vec();
    values.extend_from_slice(b.column(column)?);
    Table::from_columns([(column.to_string(), values)])
}

//! Minimal in-memory columnar table.
//!
//! The fit pipeline only needs three things from a tabular source: check that
//! a column exists, define a constant-valued column, and pull columns out as
//! plain `f64` arrays. Keeping the table this small means any richer data
//! layer (file-backed trees, dataframes) can feed the fitter by converting to
//! it at the boundary.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct Table {
    n_rows: usize,
    columns: BTreeMap<String, Vec<f64>>,
}

impl Table {
    /// Build a table from named columns. All columns must have equal length.
    pub fn from_columns(
        columns: impl IntoIterator<Item = (String, Vec<f64>)>,
    ) -> Result<Self> {
        let mut out = Table::default();
        for (name, values) in columns {
            out.add_column(name, values)?;
        }
        Ok(out)
    }

    /// Add a column, enforcing the shared row count.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.columns.is_empty() {
            self.n_rows = values.len();
        } else if values.len() != self.n_rows {
            return Err(Error::MissingData(format!(
                "column '{}' has {} rows, table has {}",
                name,
                values.len(),
                self.n_rows
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Extract a column as a plain array.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingData(format!("column '{name}' not found in table")))
    }

    /// A constant-valued column of the table's length (used for weight
    /// defaults). The table itself is not mutated.
    pub fn constant_column(&self, value: f64) -> Vec<f64> {
        vec![value; self.n_rows]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_and_extraction() {
        let table = Table::from_columns([
            ("mass".to_string(), vec![1.0, 2.0, 3.0]),
            ("weights".to_string(), vec![0.5, 0.5, 1.0]),
        ])
        .unwrap();

        assert_eq!(table.n_rows(), 3);
        assert!(table.has_column("mass"));
        assert!(!table.has_column("pt"));
        assert_eq!(table.column("weights").unwrap(), &[0.5, 0.5, 1.0]);
        assert!(table.column("pt").is_err());
    }

    #[test]
    fn mismatched_column_length_is_rejected() {
        let mut table = Table::default();
        table.add_column("mass", vec![1.0, 2.0]).unwrap();
        assert!(table.add_column("weights", vec![1.0]).is_err());
    }
}

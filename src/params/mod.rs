//! Fitted parameter sets.
//!
//! A `ParameterSet` is the portable outcome of a fit: for each parameter that
//! floated in the minimization, its best-fit value and Hessian uncertainty.
//! Sets are persisted as JSON records keyed by component name
//! (`{out_dir}/{name}.json`) so repeated runs can skip re-fitting; the write
//! then read round trip must reproduce the set exactly.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Best-fit value and uncertainty for a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub value: f64,
    pub error: f64,
}

/// Named fit results for one component.
///
/// Names are unique (map keys); insertion order carries no meaning. Once built
/// from a fit result the set is treated as read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    params: BTreeMap<String, Estimate>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter estimate.
    pub fn insert(&mut self, name: impl Into<String>, value: f64, error: f64) {
        self.params.insert(name.into(), Estimate { value, error });
    }

    pub fn get(&self, name: &str) -> Option<Estimate> {
        self.params.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Estimate)> {
        self.params.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Write the set as a pretty JSON record.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| Error::record(path, format!("failed to create: {e}")))?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::record(path, format!("failed to write: {e}")))?;
        Ok(())
    }

    /// Read a set back from a JSON record.
    ///
    /// A truncated or otherwise malformed record (e.g. from a racing writer)
    /// surfaces as a `Record` error rather than being silently repaired.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::record(path, format!("failed to open: {e}")))?;
        let set: ParameterSet = serde_json::from_reader(file)
            .map_err(|e| Error::record(path, format!("invalid record: {e}")))?;
        Ok(set)
    }
}

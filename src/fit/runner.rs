//! Cached calibration fits (MC components).
//!
//! `McFitter` wraps a [`FitComponent`] with a persistence layer: before
//! fitting it checks for a previously saved parameter record at
//! `{out_dir}/{name}.json` and, if found, loads it instead of re-fitting.
//! Either way the run finishes by freezing the calibrated shape parameters
//! onto the model.
//!
//! Cache presence is decided purely by record existence — the configuration
//! and input data are not hashed into the key. A record left behind by a
//! differently-configured run is reused silently (only a log line gives it
//! away), and records are written without locking, so concurrent runs
//! targeting the same out_dir race: last writer wins and a reader can hit a
//! partially written record, which surfaces as a `Record` error.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::ComponentConfig;
use crate::data::Table;
use crate::error::{Error, Result};
use crate::fit::component::FitComponent;
use crate::fit::tails::fix_tails;
use crate::models::Model;
use crate::params::ParameterSet;

pub struct McFitter {
    component: FitComponent,
    model: Box<dyn Model>,
}

impl McFitter {
    pub fn new(cfg: ComponentConfig, table: Option<Table>, model: Box<dyn Model>) -> Self {
        Self {
            component: FitComponent::new(cfg, table),
            model,
        }
    }

    pub fn name(&self) -> &str {
        self.component.name()
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    /// Take the (calibrated) model back out of the runner.
    pub fn into_model(self) -> Box<dyn Model> {
        self.model
    }

    /// Canonical record path for this component, if a fit is configured.
    fn record_path(&self) -> Result<PathBuf> {
        let cfg = self.component.config();
        let out_dir = cfg.out_dir.as_ref().ok_or_else(|| {
            Error::Config(format!(
                "fitting configured for component '{}' but no out_dir set",
                cfg.name
            ))
        })?;
        Ok(out_dir.join(format!("{}.json", cfg.name)))
    }

    /// Run the cached fit.
    ///
    /// - No fitting section configured: pass-through — the model is returned
    ///   untouched and no parameters are produced (`Ok(None)`).
    /// - Record missing (fresh): fit, plot, persist the parameters
    ///   (write-after-success only), continue with the in-memory result.
    /// - Record present (cached): load it, skipping fit and plot entirely.
    ///
    /// Both fit paths finish by applying tail fixing with `freeze = true`.
    pub fn run(&mut self) -> Result<Option<ParameterSet>> {
        if self.component.config().fitting.is_none() {
            debug!(component = %self.component.name(), "no fitting configuration, passing through");
            return Ok(None);
        }

        let path = self.record_path()?;
        let set = if path.is_file() {
            warn!(
                component = %self.component.name(),
                path = %path.display(),
                "fit parameters found, loading cached result"
            );
            ParameterSet::load(&path)?
        } else {
            let (set, data) = self.component.fit(self.model.as_mut())?;
            self.component.plot(&data, self.model.as_ref())?;

            // parent() is always Some here: the path was built by joining a
            // file name onto out_dir.
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| Error::record(&path, format!("failed to create out_dir: {e}")))?;
            }
            set.save(&path)?;
            set
        };

        fix_tails(self.model.as_mut(), &set, true);
        Ok(Some(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComponentConfig;
    use crate::data::gaussian_table;
    use crate::models::{Gaussian, Observable, Param, param};

    fn toy_model() -> Box<dyn Model> {
        Box::new(Gaussian::new(
            Observable::new("mass", 5200.0, 5400.0),
            Param::floating("mu", 5290.0, 5200.0, 5400.0),
            Param::fixable("sg", 15.0, 1.0, 100.0),
        ))
    }

    fn toy_table() -> Table {
        gaussian_table("mass", 5300.0, 10.0, 5200.0, 5400.0, 5000, 3).unwrap()
    }

    #[test]
    fn pass_through_without_fitting_config() {
        let mut runner = McFitter::new(
            ComponentConfig::pass_through("shape_only"),
            None,
            toy_model(),
        );
        let out = runner.run().unwrap();
        assert!(out.is_none());
        // Model untouched.
        let model = runner.into_model();
        assert_eq!(param(model.as_ref(), "sg").unwrap().value, 15.0);
        assert!(param(model.as_ref(), "sg").unwrap().floating);
    }

    #[test]
    fn fitting_config_without_out_dir_fails() {
        let mut cfg = ComponentConfig::fitted("signal", "/tmp/unused");
        cfg.out_dir = None;
        let mut runner = McFitter::new(cfg, Some(toy_table()), toy_model());
        assert!(matches!(runner.run().unwrap_err(), Error::Config(_)));
    }

    #[test]
    fn fresh_run_persists_record_and_freezes_shapes() {
        let dir = crate::test_support::temp_dir("runner_fresh");
        let mut runner = McFitter::new(
            ComponentConfig::fitted("signal", &dir),
            Some(toy_table()),
            toy_model(),
        );
        let set = runner.run().unwrap().unwrap();

        assert!(dir.join("signal.json").is_file());
        let sg = param(runner.model(), "sg").unwrap();
        assert!(!sg.floating, "shape parameter should be frozen");
        assert_eq!(sg.value, set.get("sg").unwrap().value);
        // Floating-role mean stays free.
        assert!(param(runner.model(), "mu").unwrap().floating);
    }

    #[test]
    fn second_run_uses_cache_and_performs_no_fit() {
        let dir = crate::test_support::temp_dir("runner_cached");
        let cfg = ComponentConfig::fitted("signal", &dir);

        let mut first = McFitter::new(cfg.clone(), Some(toy_table()), toy_model());
        let first_set = first.run().unwrap().unwrap();

        // No data table this time: a fit attempt would fail with MissingData,
        // so success proves the cached record was used.
        let mut second = McFitter::new(cfg, None, toy_model());
        let second_set = second.run().unwrap().unwrap();

        assert_eq!(first_set, second_set);
        let sg = param(second.model(), "sg").unwrap();
        assert!(!sg.floating);
        assert_eq!(sg.value, first_set.get("sg").unwrap().value);
    }

    #[test]
    fn corrupt_record_surfaces_as_record_error() {
        let dir = crate::test_support::temp_dir("runner_corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("signal.json"), "{\"params\": {").unwrap();

        let mut runner = McFitter::new(
            ComponentConfig::fitted("signal", &dir),
            Some(toy_table()),
            toy_model(),
        );
        assert!(matches!(runner.run().unwrap_err(), Error::Record { .. }));
    }
}

//! Single-component fit.
//!
//! A `FitComponent` binds one configuration and one (optional) data table.
//! `fit` runs the full unbinned-NLL + Hessian pass against a model; `plot`
//! renders the diagnostic overlay when a plotting section is configured.

use tracing::{info, warn};

use crate::config::{ComponentConfig, ERROR_METHOD_HESSE};
use crate::data::{Table, WeightedDataset};
use crate::error::{Error, Result};
use crate::fit::hesse::hesse_errors;
use crate::fit::minimizer::{MinimizeOptions, minimize};
use crate::models::Model;
use crate::params::ParameterSet;
use crate::plot::render_overlay;

pub struct FitComponent {
    cfg: ComponentConfig,
    table: Option<Table>,
}

impl FitComponent {
    pub fn new(cfg: ComponentConfig, table: Option<Table>) -> Self {
        Self { cfg, table }
    }

    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.cfg
    }

    /// Extract the weighted dataset this component fits on.
    pub fn dataset(&self, model: &dyn Model) -> Result<WeightedDataset> {
        let fitting = self.cfg.fitting.as_ref().ok_or_else(|| {
            Error::Config(format!("no fitting configuration for component '{}'", self.cfg.name))
        })?;
        let table = self.table.as_ref().ok_or_else(|| {
            Error::MissingData(format!("no data table supplied for component '{}'", self.cfg.name))
        })?;
        WeightedDataset::from_table(table, &model.observable().name, &fitting.weights_column)
    }

    /// Fit `model` to this component's dataset.
    ///
    /// Fails fast — before any minimization — when the fitting section is
    /// absent, the data table is absent, or an unsupported error method is
    /// configured. On success the model holds its best-fit values and the
    /// returned set covers the parameters that floated, with Hessian
    /// uncertainties.
    pub fn fit(&self, model: &mut dyn Model) -> Result<(ParameterSet, WeightedDataset)> {
        let fitting = self.cfg.fitting.as_ref().ok_or_else(|| {
            Error::Config(format!("no fitting configuration for component '{}'", self.cfg.name))
        })?;
        if fitting.error_method != ERROR_METHOD_HESSE {
            return Err(Error::UnsupportedMethod(fitting.error_method.clone()));
        }

        let data = self.dataset(model)?;
        info!(component = %self.cfg.name, events = data.len(), "fitting component");

        let minimum = minimize(model, &data, MinimizeOptions::default())?;
        if !minimum.converged {
            return Err(Error::Minimization(format!(
                "fit of component '{}' did not converge after {} iterations",
                self.cfg.name, minimum.n_iter
            )));
        }
        info!(
            component = %self.cfg.name,
            nll = minimum.nll,
            n_iter = minimum.n_iter,
            "minimum found"
        );

        let set = hesse_errors(model, &data)?;
        Ok((set, data))
    }

    /// Render the data/model overlay to `{out_dir}/{name}.png`.
    ///
    /// A missing plotting section is recoverable by design: log a warning and
    /// skip. A missing output directory when plotting *is* configured is a
    /// configuration error.
    pub fn plot(&self, data: &WeightedDataset, model: &dyn Model) -> Result<()> {
        let Some(plotting) = self.cfg.plotting.as_ref() else {
            warn!(component = %self.cfg.name, "no plotting configuration found, will skip plotting");
            return Ok(());
        };

        let out_dir = self.cfg.out_dir.as_ref().ok_or_else(|| {
            Error::Config(format!(
                "plotting configured for component '{}' but no out_dir set",
                self.cfg.name
            ))
        })?;
        std::fs::create_dir_all(out_dir)
            .map_err(|e| Error::Plot(format!("failed to create '{}': {e}", out_dir.display())))?;

        let path = out_dir.join(format!("{}.png", self.cfg.name));
        info!(component = %self.cfg.name, path = %path.display(), "saving fit plot");
        render_overlay(&path, data, model, plotting.nbins)
    }
}

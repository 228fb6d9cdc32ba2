//! Fit configuration types.
//!
//! These mirror the nested record components are configured with:
//!
//! ```json
//! {
//!   "name": "signal",
//!   "out_dir": "/tmp/massfit/signal",
//!   "fitting":  { "error_method": "minuit_hesse", "weights_column": "weights" },
//!   "plotting": { "nbins": 50, "stacked": true }
//! }
//! ```
//!
//! The `fitting` and `plotting` sections are both optional: a component with
//! no `fitting` section is a pass-through, and a component with no `plotting`
//! section skips the overlay. Renderer options beyond the typed fields are
//! kept in a free-form map and forwarded unmodified.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The single supported Hessian error method.
pub const ERROR_METHOD_HESSE: &str = "minuit_hesse";

/// Per-component configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    /// Where cache records and plots for this component live. Required
    /// whenever a fit is configured.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    #[serde(default)]
    pub fitting: Option<FittingConfig>,
    #[serde(default)]
    pub plotting: Option<PlotConfig>,
}

impl ComponentConfig {
    /// A fit-enabled config with the default error method and weight column.
    pub fn fitted(name: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            out_dir: Some(out_dir.into()),
            fitting: Some(FittingConfig::default()),
            plotting: None,
        }
    }

    /// A pass-through config: no fit, no plot.
    pub fn pass_through(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            out_dir: None,
            fitting: None,
            plotting: None,
        }
    }

    pub fn with_plotting(mut self, plotting: PlotConfig) -> Self {
        self.plotting = Some(plotting);
        self
    }
}

/// The `fitting` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittingConfig {
    pub error_method: String,
    pub weights_column: String,
}

impl Default for FittingConfig {
    fn default() -> Self {
        Self {
            error_method: ERROR_METHOD_HESSE.to_string(),
            weights_column: "weights".to_string(),
        }
    }
}

/// The `plotting` section.
///
/// `nbins` is the only option the built-in renderer interprets; everything
/// else lands in `extra` and is passed through untouched, so configs written
/// for richer renderers keep deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_nbins")]
    pub nbins: usize,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_nbins() -> usize {
    50
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            nbins: default_nbins(),
            extra: BTreeMap::new(),
        }
    }
}

/// Shared configuration for the two-stage joint fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitterConfig {
    pub error_method: String,
    pub weights_column: String,
    #[serde(default = "default_nbins")]
    pub plot_nbins: usize,
    pub out_dir: PathBuf,
}

impl FitterConfig {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            error_method: ERROR_METHOD_HESSE.to_string(),
            weights_column: "weights".to_string(),
            plot_nbins: default_nbins(),
            out_dir: out_dir.into(),
        }
    }
}

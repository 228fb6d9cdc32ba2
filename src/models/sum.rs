//! Yield-weighted composite model.

use crate::data::WeightedDataset;
use crate::error::{Error, Result};
use crate::models::{Model, Observable, Param};

/// Sum of component densities weighted by yield parameters.
///
/// The composite's `density` is normalized (component fractions are
/// `n_k / Σ n_j`), while [`Model::nll`] is overridden with the extended form
///
/// ```text
/// NLL = Σ_k n_k − Σ_i w_i ln( Σ_k n_k f_k(x_i) )
/// ```
///
/// so yields are constrained by the observed event count. Yield parameters
/// should be constructed with [`Param::floating`]; they must stay free in the
/// downstream fit and the tail-fixing policy skips them by role.
pub struct SumModel {
    obs: Observable,
    components: Vec<(Param, Box<dyn Model>)>,
}

impl SumModel {
    /// Build a composite from `(yield, component)` pairs.
    ///
    /// All components must share the same observable space.
    pub fn new(components: Vec<(Param, Box<dyn Model>)>) -> Result<Self> {
        let obs = components
            .first()
            .map(|(_, m)| m.observable().clone())
            .ok_or_else(|| Error::Config("composite model needs at least one component".into()))?;

        for (_, model) in &components {
            if *model.observable() != obs {
                return Err(Error::Config(format!(
                    "component observable '{}' does not match '{}'",
                    model.observable().name,
                    obs.name
                )));
            }
        }

        Ok(Self { obs, components })
    }

    fn total_yield(&self) -> f64 {
        self.components.iter().map(|(n, _)| n.value).sum()
    }

    /// Expected event density at `x` in count units: `Σ n_k f_k(x)`.
    pub fn extended_density(&self, x: f64) -> f64 {
        self.components
            .iter()
            .map(|(n, m)| n.value * m.density(x))
            .sum()
    }
}

impl Model for SumModel {
    fn observable(&self) -> &Observable {
        &self.obs
    }

    fn params(&self) -> Vec<&Param> {
        let mut out = Vec::new();
        for (n, model) in &self.components {
            out.push(n);
            out.extend(model.params());
        }
        out
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        let mut out = Vec::new();
        for (n, model) in &mut self.components {
            out.push(n);
            out.extend(model.params_mut());
        }
        out
    }

    fn density(&self, x: f64) -> f64 {
        let total = self.total_yield();
        if !(total.is_finite() && total > 0.0) {
            return f64::NAN;
        }
        self.extended_density(x) / total
    }

    fn nll(&self, data: &WeightedDataset) -> f64 {
        let total = self.total_yield();
        if !total.is_finite() {
            return f64::INFINITY;
        }

        let mut nll = total;
        for (&x, &w) in data.values.iter().zip(data.weights.iter()) {
            let f = self.extended_density(x);
            if !(f.is_finite() && f > 0.0) {
                return f64::INFINITY;
            }
            nll -= w * f.ln();
        }
        nll
    }
}

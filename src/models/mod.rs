//! Probability-density models.
//!
//! The fit engine only ever talks to models through the [`Model`] trait:
//!
//! - an observable-space descriptor (name + window)
//! - an enumerable list of named parameters with value/floating accessors
//! - a normalized density under the current parameter values
//! - a weighted unbinned negative log-likelihood
//!
//! Densities are normalized over the observable window, so the plain NLL
//! default implementation works for any single-component model; the composite
//! [`SumModel`] overrides `nll` with the extended form that constrains yields.

mod exponential;
mod gauss;
mod param;
mod sum;

pub use exponential::Exponential;
pub use gauss::Gaussian;
pub use param::{Param, ParamRole};
pub use sum::SumModel;

use crate::data::WeightedDataset;

/// Observable-space descriptor: column name and fit window.
#[derive(Debug, Clone, PartialEq)]
pub struct Observable {
    pub name: String,
    pub lo: f64,
    pub hi: f64,
}

impl Observable {
    pub fn new(name: impl Into<String>, lo: f64, hi: f64) -> Self {
        Self {
            name: name.into(),
            lo,
            hi,
        }
    }
}

/// A fittable probability-density model.
pub trait Model {
    fn observable(&self) -> &Observable;

    /// All parameters, in a stable order.
    fn params(&self) -> Vec<&Param>;

    /// Mutable view of all parameters, same order as [`Model::params`].
    fn params_mut(&mut self) -> Vec<&mut Param>;

    /// Normalized density at `x` under the current parameter values.
    ///
    /// Returns a non-finite or non-positive value when the current parameters
    /// are invalid (e.g. sigma driven to zero); the NLL maps that to infinity
    /// so the minimizer backs away.
    fn density(&self, x: f64) -> f64;

    /// Weighted unbinned negative log-likelihood.
    fn nll(&self, data: &WeightedDataset) -> f64 {
        let mut total = 0.0;
        for (&x, &w) in data.values.iter().zip(data.weights.iter()) {
            let f = self.density(x);
            if !(f.is_finite() && f > 0.0) {
                return f64::INFINITY;
            }
            total -= w * f.ln();
        }
        total
    }
}

/// Look up a parameter by name.
pub fn param<'a>(model: &'a dyn Model, name: &str) -> Option<&'a Param> {
    model.params().into_iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrate(model: &dyn Model, n: usize) -> f64 {
        // Trapezoidal integral of the density over the observable window.
        let obs = model.observable().clone();
        let h = (obs.hi - obs.lo) / n as f64;
        let mut sum = 0.5 * (model.density(obs.lo) + model.density(obs.hi));
        for i in 1..n {
            sum += model.density(obs.lo + i as f64 * h);
        }
        sum * h
    }

    #[test]
    fn gaussian_density_is_normalized_over_window() {
        let obs = Observable::new("mass", 5200.0, 5400.0);
        let model = Gaussian::new(
            obs,
            Param::fixable("mu", 5300.0, 5200.0, 5400.0),
            Param::fixable("sg", 25.0, 1.0, 100.0),
        );
        let integral = integrate(&model, 4000);
        assert!(
            (integral - 1.0).abs() < 1e-6,
            "gaussian integral {integral} != 1"
        );
    }

    #[test]
    fn exponential_density_is_normalized_over_window() {
        let obs = Observable::new("mass", 4800.0, 6000.0);
        let model = Exponential::new(obs, Param::fixable("lam", -1.0 / 300.0, -0.1, 0.0));
        let integral = integrate(&model, 4000);
        assert!(
            (integral - 1.0).abs() < 1e-6,
            "exponential integral {integral} != 1"
        );
    }

    #[test]
    fn sum_density_is_normalized_over_window() {
        let obs = Observable::new("mass", 4800.0, 6000.0);
        let sig = Gaussian::new(
            obs.clone(),
            Param::fixable("mu", 5300.0, 5200.0, 5400.0),
            Param::fixable("sg", 50.0, 1.0, 200.0),
        );
        let bkg = Exponential::new(obs, Param::fixable("lam", -1.0 / 500.0, -0.1, 0.0));
        let model = SumModel::new(vec![
            (Param::floating("n_sig", 1000.0, 0.0, 1e7), Box::new(sig)),
            (Param::floating("n_bkg", 4000.0, 0.0, 1e7), Box::new(bkg)),
        ])
        .unwrap();

        let integral = integrate(&model, 4000);
        assert!((integral - 1.0).abs() < 1e-5, "sum integral {integral} != 1");
    }

    #[test]
    fn param_lookup_by_name() {
        let obs = Observable::new("mass", 5200.0, 5400.0);
        let model = Gaussian::new(
            obs,
            Param::floating("mu", 5300.0, 5200.0, 5400.0),
            Param::fixable("sg", 10.0, 1.0, 100.0),
        );
        assert_eq!(param(&model, "mu").unwrap().role, ParamRole::Floating);
        assert!(param(&model, "missing").is_none());
    }
}

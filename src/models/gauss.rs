//! Gaussian peak model.

use crate::math::std_normal_cdf;
use crate::models::{Model, Observable, Param};

/// Gaussian density truncated to the observable window.
///
/// Parameters, in order: mean, sigma.
#[derive(Debug, Clone)]
pub struct Gaussian {
    obs: Observable,
    mean: Param,
    sigma: Param,
}

impl Gaussian {
    pub fn new(obs: Observable, mean: Param, sigma: Param) -> Self {
        Self { obs, mean, sigma }
    }
}

impl Model for Gaussian {
    fn observable(&self) -> &Observable {
        &self.obs
    }

    fn params(&self) -> Vec<&Param> {
        vec![&self.mean, &self.sigma]
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        vec![&mut self.mean, &mut self.sigma]
    }

    fn density(&self, x: f64) -> f64 {
        let mu = self.mean.value;
        let sg = self.sigma.value;
        if !(sg.is_finite() && sg > 0.0) {
            return f64::NAN;
        }

        // Normalization over [lo, hi] rather than the full real line.
        let norm = std_normal_cdf((self.obs.hi - mu) / sg) - std_normal_cdf((self.obs.lo - mu) / sg);
        if !(norm.is_finite() && norm > 0.0) {
            return f64::NAN;
        }

        let z = (x - mu) / sg;
        let phi = (-0.5 * z * z).exp() / (sg * (2.0 * std::f64::consts::PI).sqrt());
        phi / norm
    }
}

//! Exponential background model.

use crate::models::{Model, Observable, Param};

/// Exponential density `f(x) ∝ exp(lambda * x)` normalized over the
/// observable window. Negative lambda gives the usual falling combinatorial
/// background shape; lambda near zero degrades smoothly to a uniform density.
///
/// Single parameter: lambda.
#[derive(Debug, Clone)]
pub struct Exponential {
    obs: Observable,
    lambda: Param,
}

impl Exponential {
    pub fn new(obs: Observable, lambda: Param) -> Self {
        Self { obs, lambda }
    }
}

impl Model for Exponential {
    fn observable(&self) -> &Observable {
        &self.obs
    }

    fn params(&self) -> Vec<&Param> {
        vec![&self.lambda]
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        vec![&mut self.lambda]
    }

    fn density(&self, x: f64) -> f64 {
        let lam = self.lambda.value;
        let width = self.obs.hi - self.obs.lo;
        if !(width.is_finite() && width > 0.0) {
            return f64::NAN;
        }

        // |lam * width| small: the normalization difference cancels to
        // rounding noise, so switch to the uniform limit explicitly.
        if (lam * width).abs() < 1e-12 {
            return 1.0 / width;
        }

        // Factor exp(lam*lo) out of the normalization for numerical range:
        // integral = (exp(lam*(hi-lo)) - 1) / lam, relative to lo.
        let norm = ((lam * width).exp() - 1.0) / lam;
        if !(norm.is_finite() && norm > 0.0) {
            return f64::NAN;
        }
        (lam * (x - self.obs.lo)).exp() / norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_shape_for_negative_lambda() {
        let model = Exponential::new(
            Observable::new("mass", 4800.0, 6000.0),
            Param::fixable("lam", -1.0 / 300.0, -0.1, 0.0),
        );
        assert!(model.density(4900.0) > model.density(5500.0));
    }

    #[test]
    fn near_zero_lambda_is_uniform() {
        let model = Exponential::new(
            Observable::new("mass", 0.0, 10.0),
            Param::fixable("lam", 0.0, -1.0, 1.0),
        );
        assert!((model.density(2.0) - 0.1).abs() < 1e-12);
        assert!((model.density(9.0) - 0.1).abs() < 1e-12);
    }
}

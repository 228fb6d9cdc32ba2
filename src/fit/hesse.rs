//! Hessian-based uncertainty estimation.
//!
//! After the minimizer lands on a minimum, parameter uncertainties come from
//! the curvature of the NLL there: the covariance matrix is the inverse of
//! the Hessian and uncertainties are the square roots of its diagonal. The
//! Hessian is built by central finite differences, which is plenty for the
//! small parameter counts this crate fits.

use nalgebra::DMatrix;

use crate::data::WeightedDataset;
use crate::error::{Error, Result};
use crate::fit::minimizer::floating_layout;
use crate::models::Model;
use crate::params::ParameterSet;

/// Compute Hessian uncertainties for the model's floating parameters at their
/// current (best-fit) values, returning the resulting [`ParameterSet`].
///
/// The model's parameter values are perturbed during evaluation and restored
/// before returning.
pub fn hesse_errors(model: &mut dyn Model, data: &WeightedDataset) -> Result<ParameterSet> {
    let (idx, center, bounds) = floating_layout(model);
    let names: Vec<String> = {
        let params = model.params();
        idx.iter().map(|&i| params[i].name.clone()).collect()
    };

    let n = center.len();
    if n == 0 {
        return Ok(ParameterSet::new());
    }

    let steps: Vec<f64> = center
        .iter()
        .zip(bounds.iter())
        .map(|(&v, &(lo, hi))| fd_step(v, lo, hi))
        .collect();

    let mut eval = |point: &[f64]| -> Result<f64> {
        {
            let mut params = model.params_mut();
            for (k, &i) in idx.iter().enumerate() {
                params[i].value = point[k];
            }
        }
        let f = model.nll(data);
        if !f.is_finite() {
            return Err(Error::Minimization(
                "non-finite likelihood while evaluating the Hessian".into(),
            ));
        }
        Ok(f)
    };

    let f0 = eval(&center)?;
    let mut hessian = DMatrix::<f64>::zeros(n, n);

    for i in 0..n {
        // Diagonal: (f(+h) - 2 f0 + f(-h)) / h^2.
        let mut up = center.clone();
        up[i] += steps[i];
        let mut down = center.clone();
        down[i] -= steps[i];
        let d2 = (eval(&up)? - 2.0 * f0 + eval(&down)?) / (steps[i] * steps[i]);
        hessian[(i, i)] = d2;

        // Off-diagonal: four-point cross difference.
        for j in (i + 1)..n {
            let mut pp = center.clone();
            pp[i] += steps[i];
            pp[j] += steps[j];
            let mut pm = center.clone();
            pm[i] += steps[i];
            pm[j] -= steps[j];
            let mut mp = center.clone();
            mp[i] -= steps[i];
            mp[j] += steps[j];
            let mut mm = center.clone();
            mm[i] -= steps[i];
            mm[j] -= steps[j];

            let d2 = (eval(&pp)? - eval(&pm)? - eval(&mp)? + eval(&mm)?)
                / (4.0 * steps[i] * steps[j]);
            hessian[(i, j)] = d2;
            hessian[(j, i)] = d2;
        }
    }

    // Restore the best-fit point before handing the model back.
    {
        let mut params = model.params_mut();
        for (k, &i) in idx.iter().enumerate() {
            params[i].value = center[k];
        }
    }

    let covariance = invert_spd(&hessian).ok_or_else(|| {
        Error::Minimization("Hessian is not invertible at the minimum".into())
    })?;

    let mut set = ParameterSet::new();
    for (k, name) in names.iter().enumerate() {
        let var = covariance[(k, k)];
        if !(var.is_finite() && var > 0.0) {
            return Err(Error::Minimization(format!(
                "non-positive variance for parameter '{name}'"
            )));
        }
        set.insert(name, center[k], var.sqrt());
    }

    Ok(set)
}

/// Finite-difference step: scale-aware but bounded by the parameter window so
/// tightly-bounded parameters keep a sensible curvature probe.
fn fd_step(value: f64, lo: f64, hi: f64) -> f64 {
    let width = hi - lo;
    let mut step = 1e-4 * value.abs();
    if width.is_finite() && width > 0.0 {
        step = step.max(1e-6 * width);
    }
    step.max(1e-9)
}

/// Invert a symmetric positive-definite matrix, with an LU fallback for the
/// nearly-degenerate cases Cholesky rejects.
fn invert_spd(m: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    if let Some(chol) = m.clone().cholesky() {
        return Some(chol.inverse());
    }
    m.clone().try_inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{WeightedDataset, gaussian_table};
    use crate::fit::minimizer::{MinimizeOptions, minimize};
    use crate::models::{Gaussian, Observable, Param};

    #[test]
    fn gaussian_errors_scale_with_sample_size() {
        let n = 5000usize;
        let table = gaussian_table("mass", 5300.0, 10.0, 5200.0, 5400.0, n, 23).unwrap();
        let data = WeightedDataset::from_table(&table, "mass", "weights").unwrap();
        let mut model = Gaussian::new(
            Observable::new("mass", 5200.0, 5400.0),
            Param::fixable("mu", 5295.0, 5200.0, 5400.0),
            Param::fixable("sg", 12.0, 1.0, 100.0),
        );

        minimize(&mut model, &data, MinimizeOptions::default()).unwrap();
        let set = hesse_errors(&mut model, &data).unwrap();

        // Analytic expectations: err(mu) = sg/sqrt(n), err(sg) = sg/sqrt(2n).
        let mu = set.get("mu").unwrap();
        let sg = set.get("sg").unwrap();
        let expect_mu = 10.0 / (n as f64).sqrt();
        let expect_sg = 10.0 / (2.0 * n as f64).sqrt();
        assert!(
            (mu.error - expect_mu).abs() < 0.5 * expect_mu,
            "err(mu) {} vs expected {}",
            mu.error,
            expect_mu
        );
        assert!(
            (sg.error - expect_sg).abs() < 0.5 * expect_sg,
            "err(sg) {} vs expected {}",
            sg.error,
            expect_sg
        );
    }

    #[test]
    fn fixed_parameters_are_excluded_from_the_set() {
        let table = gaussian_table("mass", 5300.0, 10.0, 5200.0, 5400.0, 1000, 5).unwrap();
        let data = WeightedDataset::from_table(&table, "mass", "weights").unwrap();
        let mut model = Gaussian::new(
            Observable::new("mass", 5200.0, 5400.0),
            Param::fixable("mu", 5300.0, 5200.0, 5400.0),
            Param::fixable("sg", 10.0, 1.0, 100.0),
        );
        model.params_mut()[1].floating = false;

        minimize(&mut model, &data, MinimizeOptions::default()).unwrap();
        let set = hesse_errors(&mut model, &data).unwrap();
        assert!(set.contains("mu"));
        assert!(!set.contains("sg"));
        assert_eq!(set.len(), 1);
    }
}

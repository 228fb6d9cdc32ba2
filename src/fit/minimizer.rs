//! Unbinned NLL minimization over a model's floating parameters.
//!
//! Nelder–Mead simplex search. Derivative-free is the right trade-off here:
//! the parameter dimension is tiny (1–5 floating parameters per fit), the
//! objective is smooth, and we avoid wiring analytic gradients through the
//! `Model` trait. The search is fully deterministic: the simplex is seeded
//! from the current parameter values with scale-aware steps, no RNG anywhere.
//!
//! Bounds are enforced by clamping proposed points into each parameter's
//! `[lower, upper]` before evaluation, so the model never sees out-of-range
//! values.

use tracing::debug;

use crate::data::WeightedDataset;
use crate::error::{Error, Result};
use crate::models::Model;

/// Search controls. The defaults converge comfortably for the fits this crate
/// runs; they are exposed mainly so tests can tighten or loosen them.
#[derive(Debug, Clone, Copy)]
pub struct MinimizeOptions {
    pub max_iter: usize,
    /// Relative spread of simplex function values at which we stop.
    pub tol: f64,
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        Self {
            max_iter: 5_000,
            tol: 1e-10,
        }
    }
}

/// Outcome of a minimization, without uncertainties (see `hesse`).
#[derive(Debug, Clone)]
pub struct Minimum {
    pub nll: f64,
    pub converged: bool,
    pub n_iter: usize,
}

/// Context for evaluating the objective at a floating-parameter point.
struct Objective<'a> {
    model: &'a mut dyn Model,
    data: &'a WeightedDataset,
    /// Indices of floating parameters within `model.params()` order.
    idx: Vec<usize>,
    bounds: Vec<(f64, f64)>,
}

impl<'a> Objective<'a> {
    fn eval(&mut self, point: &[f64]) -> f64 {
        self.write(point);
        self.model.nll(self.data)
    }

    /// Write a (clamped) point into the model's floating parameters.
    fn write(&mut self, point: &[f64]) {
        let mut params = self.model.params_mut();
        for (k, &i) in self.idx.iter().enumerate() {
            let (lo, hi) = self.bounds[k];
            params[i].value = point[k].clamp(lo, hi);
        }
    }
}

/// Minimize `model.nll(data)` over the floating parameters in place.
///
/// On success the model's floating parameters hold the best-fit values.
pub fn minimize(
    model: &mut dyn Model,
    data: &WeightedDataset,
    opts: MinimizeOptions,
) -> Result<Minimum> {
    let (idx, starts, bounds) = floating_layout(model);

    if idx.is_empty() {
        // Nothing to vary; the model is fully fixed.
        let nll = model.nll(data);
        return Ok(Minimum {
            nll,
            converged: true,
            n_iter: 0,
        });
    }

    let mut obj = Objective {
        model,
        data,
        idx,
        bounds,
    };

    let n = starts.len();
    let f0 = obj.eval(&starts);
    if !f0.is_finite() {
        return Err(Error::Minimization(
            "initial parameter values give a non-finite likelihood".into(),
        ));
    }

    // Simplex seeded along each axis with a step that respects both the
    // parameter's magnitude and its bound width.
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((starts.clone(), f0));
    for k in 0..n {
        let mut point = starts.clone();
        point[k] += axis_step(starts[k], obj.bounds[k]);
        let f = obj.eval(&point);
        simplex.push((point, f));
    }

    // Standard Nelder–Mead coefficients.
    const ALPHA: f64 = 1.0; // reflection
    const GAMMA: f64 = 2.0; // expansion
    const RHO: f64 = 0.5; // contraction
    const SIGMA: f64 = 0.5; // shrink

    let mut converged = false;
    let mut n_iter = 0;

    for iter in 0..opts.max_iter {
        n_iter = iter + 1;
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let f_best = simplex[0].1;
        let f_worst = simplex[n].1;
        if f_worst.is_finite() && (f_worst - f_best).abs() <= opts.tol * (f_best.abs() + opts.tol) {
            converged = true;
            break;
        }

        // Centroid of all but the worst vertex.
        let mut centroid = vec![0.0; n];
        for (point, _) in &simplex[..n] {
            for (c, &x) in centroid.iter_mut().zip(point.iter()) {
                *c += x / n as f64;
            }
        }

        let worst = simplex[n].0.clone();
        let reflected: Vec<f64> = centroid
            .iter()
            .zip(worst.iter())
            .map(|(&c, &w)| c + ALPHA * (c - w))
            .collect();
        let f_reflected = obj.eval(&reflected);

        if f_reflected < simplex[0].1 {
            // Try to expand further in the same direction.
            let expanded: Vec<f64> = centroid
                .iter()
                .zip(worst.iter())
                .map(|(&c, &w)| c + GAMMA * ALPHA * (c - w))
                .collect();
            let f_expanded = obj.eval(&expanded);
            simplex[n] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
            continue;
        }

        if f_reflected < simplex[n - 1].1 {
            simplex[n] = (reflected, f_reflected);
            continue;
        }

        // Contract toward the centroid.
        let contracted: Vec<f64> = centroid
            .iter()
            .zip(worst.iter())
            .map(|(&c, &w)| c + RHO * (w - c))
            .collect();
        let f_contracted = obj.eval(&contracted);
        if f_contracted < simplex[n].1 {
            simplex[n] = (contracted, f_contracted);
            continue;
        }

        // Shrink everything toward the best vertex.
        let best = simplex[0].0.clone();
        for vertex in simplex.iter_mut().skip(1) {
            for (x, &b) in vertex.0.iter_mut().zip(best.iter()) {
                *x = b + SIGMA * (*x - b);
            }
            vertex.1 = obj.eval(&vertex.0);
        }
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let (best_point, best_f) = simplex.swap_remove(0);
    obj.write(&best_point);

    debug!(nll = best_f, n_iter, converged, "minimization finished");

    if !best_f.is_finite() {
        return Err(Error::Minimization(
            "minimizer terminated on a non-finite likelihood".into(),
        ));
    }

    Ok(Minimum {
        nll: best_f,
        converged,
        n_iter,
    })
}

/// Floating-parameter layout: indices into `params()` order, start values,
/// bounds.
pub(crate) fn floating_layout(model: &dyn Model) -> (Vec<usize>, Vec<f64>, Vec<(f64, f64)>) {
    let mut idx = Vec::new();
    let mut starts = Vec::new();
    let mut bounds = Vec::new();
    for (i, p) in model.params().into_iter().enumerate() {
        if p.floating {
            idx.push(i);
            starts.push(p.value);
            bounds.push((p.lower, p.upper));
        }
    }
    (idx, starts, bounds)
}

fn axis_step(start: f64, (lo, hi): (f64, f64)) -> f64 {
    let width = hi - lo;
    let mut step = 0.1 * start.abs();
    if width.is_finite() && width > 0.0 {
        step = step.min(0.05 * width);
    }
    if step <= 0.0 {
        step = if width.is_finite() && width > 0.0 {
            0.05 * width
        } else {
            0.1
        };
    }
    // Step away from an upper bound rather than into it.
    if start + step > hi { -step } else { step }
}

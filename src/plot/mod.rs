//! Diagnostic fit overlays.
//!
//! Renders a weighted histogram of the dataset with the fitted model curve on
//! top, saved as a PNG. We keep Plotters' feature set minimal (no font
//! backends), so the overlay is series-only: histogram bars, model curve, no
//! text. That is enough to eyeball whether a fit landed where the data is.

use std::path::Path;

use plotters::prelude::*;

use crate::data::WeightedDataset;
use crate::error::{Error, Result};
use crate::models::Model;

const PLOT_SIZE: (u32, u32) = (900, 600);
const CURVE_POINTS: usize = 400;

/// Render the data/model overlay to `path`.
///
/// The histogram is filled with event weights over the model's observable
/// window; the curve is the model density scaled to expected counts per bin
/// (`total_weight * bin_width * f(x)`), so the two are directly comparable.
pub fn render_overlay(
    path: &Path,
    data: &WeightedDataset,
    model: &dyn Model,
    nbins: usize,
) -> Result<()> {
    let obs = model.observable();
    let nbins = nbins.max(1);
    let bin_width = (obs.hi - obs.lo) / nbins as f64;
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Err(Error::Plot(format!(
            "degenerate observable window [{}, {}]",
            obs.lo, obs.hi
        )));
    }

    // Weighted histogram over the observable window.
    let mut bins = vec![0.0f64; nbins];
    for (&x, &w) in data.values.iter().zip(data.weights.iter()) {
        if x < obs.lo || x > obs.hi {
            continue;
        }
        let idx = (((x - obs.lo) / bin_width) as usize).min(nbins - 1);
        bins[idx] += w;
    }

    // Model curve in expected-count units.
    let scale = data.total_weight() * bin_width;
    let curve: Vec<(f64, f64)> = (0..=CURVE_POINTS)
        .map(|i| {
            let x = obs.lo + (obs.hi - obs.lo) * i as f64 / CURVE_POINTS as f64;
            (x, scale * model.density(x).max(0.0))
        })
        .collect();

    let hist_max = bins.iter().copied().fold(0.0f64, f64::max);
    let curve_max = curve.iter().map(|&(_, y)| y).fold(0.0f64, f64::max);
    let y_max = 1.1 * hist_max.max(curve_max).max(1e-9);

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| Error::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(obs.lo..obs.hi, 0.0..y_max)
        .map_err(|e| Error::Plot(e.to_string()))?;

    // Histogram bars as filled rectangles; avoids the segmented-coordinate
    // machinery Plotters' histogram series wants.
    chart
        .draw_series(bins.iter().enumerate().map(|(i, &count)| {
            let x0 = obs.lo + i as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, count)], BLUE.mix(0.35).filled())
        }))
        .map_err(|e| Error::Plot(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(curve, RED.stroke_width(2)))
        .map_err(|e| Error::Plot(e.to_string()))?;

    root.present().map_err(|e| Error::Plot(e.to_string()))?;
    Ok(())
}

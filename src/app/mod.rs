//! Demo pipeline behind the CLI.
//!
//! Wires the pieces together the way a calibration workflow would: synthetic
//! simulation and pseudo-data tables in, two-stage joint fit out, results
//! printed as a plain table.

use tracing::info;

use crate::cli::DemoArgs;
use crate::config::FitterConfig;
use crate::data::{exponential_table, gaussian_table, merged_table};
use crate::error::Result;
use crate::fit::Fitter;
use crate::models::{Exponential, Gaussian, Observable, Param};
use crate::params::ParameterSet;

// Demo truth: a B-like mass peak on a falling combinatorial background.
const MASS_LO: f64 = 5000.0;
const MASS_HI: f64 = 5600.0;
const TRUE_MEAN: f64 = 5280.0;
const TRUE_SIGMA: f64 = 25.0;
const BKG_SLOPE: f64 = 1.0 / 250.0;

pub fn run_demo(args: &DemoArgs) -> Result<()> {
    info!(out_dir = %args.out_dir.display(), "generating synthetic samples");

    let sim = gaussian_table(
        "mass", TRUE_MEAN, TRUE_SIGMA, MASS_LO, MASS_HI, args.n_sim, args.seed,
    )?;
    let sig = gaussian_table(
        "mass",
        TRUE_MEAN,
        TRUE_SIGMA,
        MASS_LO,
        MASS_HI,
        args.n_signal,
        args.seed.wrapping_add(1),
    )?;
    let bkg = exponential_table(
        "mass",
        BKG_SLOPE,
        MASS_LO,
        MASS_HI,
        args.n_background,
        args.seed.wrapping_add(2),
    )?;
    let data = merged_table("mass", &sig, &bkg)?;

    let obs = Observable::new("mass", MASS_LO, MASS_HI);
    let signal = Box::new(Gaussian::new(
        obs.clone(),
        // The mean is allowed to float in the data fit; the width is
        // calibrated on simulation and frozen.
        Param::floating("mu", TRUE_MEAN + 10.0, MASS_LO, MASS_HI),
        Param::fixable("sg", 2.0 * TRUE_SIGMA, 1.0, 300.0),
    ));
    let background = Box::new(Exponential::new(
        obs,
        Param::fixable("lam", -BKG_SLOPE / 2.0, -0.05, 0.0),
    ));

    let mut conf = FitterConfig::new(&args.out_dir);
    conf.plot_nbins = args.nbins;

    let result = Fitter::new(data, sim, signal, background, conf).fit()?;

    println!("-- calibration (simulation) --");
    print_set(&result.calibration);
    println!("-- joint fit (data) --");
    print_set(&result.joint);
    println!(
        "truth: mu = {TRUE_MEAN}, sg = {TRUE_SIGMA}, n_sig = {}, n_bkg = {}",
        args.n_signal, args.n_background
    );

    Ok(())
}

fn print_set(set: &ParameterSet) {
    for (name, estimate) in set.iter() {
        println!(
            "{name:<10} {value:>14.4} +- {error:.4}",
            value = estimate.value,
            error = estimate.error
        );
    }
}

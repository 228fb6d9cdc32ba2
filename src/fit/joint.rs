//! Two-stage joint fit: calibrate on simulation, then fit data.
//!
//! Stage 1 fits the signal model to the auxiliary (simulation) sample through
//! the cached [`McFitter`] path and freezes the calibrated shape parameters.
//! Stage 2 builds a yield-weighted signal+background composite and fits it to
//! the real dataset, where only yields and floating-by-design parameters
//! remain free. Any stage-1 failure aborts the whole pipeline; no joint fit
//! is attempted with an uncalibrated signal model.

use tracing::info;

use crate::config::{ComponentConfig, FitterConfig, FittingConfig, PlotConfig};
use crate::data::Table;
use crate::error::Result;
use crate::fit::component::FitComponent;
use crate::fit::runner::McFitter;
use crate::models::{Model, Param, SumModel};
use crate::params::ParameterSet;

pub struct Fitter {
    data: Table,
    sim: Table,
    signal: Box<dyn Model>,
    background: Box<dyn Model>,
    conf: FitterConfig,
}

/// Outcome of the two-stage protocol.
pub struct JointFit {
    /// Calibration result from the auxiliary-sample fit.
    pub calibration: ParameterSet,
    /// Joint data-fit result (yields + floating parameters).
    pub joint: ParameterSet,
}

impl Fitter {
    pub fn new(
        data: Table,
        sim: Table,
        signal: Box<dyn Model>,
        background: Box<dyn Model>,
        conf: FitterConfig,
    ) -> Self {
        Self {
            data,
            sim,
            signal,
            background,
            conf,
        }
    }

    /// Run the full protocol and return both stage results.
    pub fn fit(self) -> Result<JointFit> {
        let Fitter {
            data,
            sim,
            signal,
            background,
            conf,
        } = self;

        // Stage 1: calibrate the signal shape on simulation. The runner
        // freezes everything it fitted except floating-by-design parameters.
        info!("calibrating signal model on the auxiliary sample");
        let signal_cfg = ComponentConfig {
            name: "signal".to_string(),
            out_dir: Some(conf.out_dir.clone()),
            fitting: Some(FittingConfig {
                error_method: conf.error_method.clone(),
                weights_column: conf.weights_column.clone(),
            }),
            plotting: Some(PlotConfig {
                nbins: conf.plot_nbins,
                extra: Default::default(),
            }),
        };
        let mut runner = McFitter::new(signal_cfg, Some(sim), signal);
        let calibration = runner.run()?.unwrap_or_default();
        let signal = runner.into_model();

        // Stage 2: extended joint fit against the real dataset. Yield starts
        // split the observed sample evenly; the minimizer sorts it out.
        info!("running joint signal+background fit on data");
        let n_events = data.n_rows() as f64;
        let start_yield = (n_events / 2.0).max(1.0);
        let yield_cap = (10.0 * n_events).max(1e3);
        let mut joint_model = SumModel::new(vec![
            (
                Param::floating("n_sig", start_yield, 0.0, yield_cap),
                signal,
            ),
            (
                Param::floating("n_bkg", start_yield, 0.0, yield_cap),
                background,
            ),
        ])?;

        let joint_cfg = ComponentConfig {
            name: "joint".to_string(),
            out_dir: Some(conf.out_dir.clone()),
            fitting: Some(FittingConfig {
                error_method: conf.error_method,
                weights_column: conf.weights_column,
            }),
            plotting: Some(PlotConfig {
                nbins: conf.plot_nbins,
                extra: Default::default(),
            }),
        };
        let component = FitComponent::new(joint_cfg, Some(data));
        let (joint, dataset) = component.fit(&mut joint_model)?;
        component.plot(&dataset, &joint_model)?;

        Ok(JointFit { calibration, joint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{exponential_table, gaussian_table, merged_table};
    use crate::models::{Exponential, Gaussian, Observable, Param};

    const LO: f64 = 5000.0;
    const HI: f64 = 5600.0;

    fn signal_model() -> Box<dyn Model> {
        Box::new(Gaussian::new(
            Observable::new("mass", LO, HI),
            // Mean floats by design in the data fit; sigma is calibrated on
            // simulation and then frozen.
            Param::floating("mu", 5290.0, LO, HI),
            Param::fixable("sg", 20.0, 1.0, 200.0),
        ))
    }

    fn background_model() -> Box<dyn Model> {
        Box::new(Exponential::new(
            Observable::new("mass", LO, HI),
            Param::fixable("lam", -1.0 / 400.0, -0.05, 0.0),
        ))
    }

    #[test]
    fn joint_fit_recovers_yields_and_freezes_signal_shape() {
        let dir = crate::test_support::temp_dir("joint_fit");

        let n_sig = 2000usize;
        let n_bkg = 4000usize;
        let sim = gaussian_table("mass", 5300.0, 10.0, LO, HI, 5000, 17).unwrap();
        let sig = gaussian_table("mass", 5300.0, 10.0, LO, HI, n_sig, 31).unwrap();
        let bkg = exponential_table("mass", 1.0 / 300.0, LO, HI, n_bkg, 47).unwrap();
        let data = merged_table("mass", &sig, &bkg).unwrap();

        let fitter = Fitter::new(
            data,
            sim,
            signal_model(),
            background_model(),
            FitterConfig::new(&dir),
        );
        let result = fitter.fit().unwrap();

        // Calibration fitted both signal parameters.
        assert!(result.calibration.contains("mu"));
        assert!(result.calibration.contains("sg"));
        let cal_sg = result.calibration.get("sg").unwrap();
        assert!((cal_sg.value - 10.0).abs() < 5.0 * cal_sg.error + 0.5);

        // Joint fit: yields and the floating mean are in the result, the
        // frozen sigma is not.
        let ns = result.joint.get("n_sig").unwrap();
        let nb = result.joint.get("n_bkg").unwrap();
        assert!(result.joint.contains("mu"));
        assert!(result.joint.contains("lam"));
        assert!(!result.joint.contains("sg"));

        assert!(
            (ns.value - n_sig as f64).abs() < 5.0 * ns.error + 50.0,
            "n_sig {} +- {} vs true {}",
            ns.value,
            ns.error,
            n_sig
        );
        assert!(
            (nb.value - n_bkg as f64).abs() < 5.0 * nb.error + 50.0,
            "n_bkg {} +- {} vs true {}",
            nb.value,
            nb.error,
            n_bkg
        );

        // Stage 1 left its cache record and plot behind.
        assert!(dir.join("signal.json").is_file());
        assert!(dir.join("signal.png").is_file());
        assert!(dir.join("joint.png").is_file());
    }

    #[test]
    fn stage_one_failure_aborts_the_joint_fit() {
        let dir = crate::test_support::temp_dir("joint_abort");
        let sig = gaussian_table("mass", 5300.0, 10.0, LO, HI, 100, 5).unwrap();
        let bkg = exponential_table("mass", 1.0 / 300.0, LO, HI, 100, 6).unwrap();
        let data = merged_table("mass", &sig, &bkg).unwrap();

        // Simulation table lacks the observable column entirely.
        let bad_sim = Table::from_columns([("pt".to_string(), vec![1.0, 2.0])]).unwrap();

        let fitter = Fitter::new(
            data,
            bad_sim,
            signal_model(),
            background_model(),
            FitterConfig::new(&dir),
        );
        assert!(fitter.fit().is_err());
        // No joint artifacts were produced.
        assert!(!dir.join("joint.png").exists());
    }
}

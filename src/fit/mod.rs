//! Fit engine and orchestration.
//!
//! Layered bottom-up:
//!
//! - `minimizer` / `hesse` — the numerical core (NLL minimization, Hessian
//!   uncertainties)
//! - `component` — a single configured fit (dataset build, fit, plot)
//! - `tails` — the freeze/release policy for calibrated shape parameters
//! - `runner` — the caching layer around a component fit
//! - `joint` — the two-stage calibrate-then-fit protocol

pub mod component;
pub mod hesse;
pub mod joint;
pub mod minimizer;
pub mod runner;
pub mod tails;

pub use component::FitComponent;
pub use hesse::hesse_errors;
pub use joint::{Fitter, JointFit};
pub use minimizer::{MinimizeOptions, Minimum, minimize};
pub use runner::McFitter;
pub use tails::fix_tails;

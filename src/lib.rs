//! `massfit` library crate.
//!
//! Orchestrates maximum-likelihood fits of density models to weighted event
//! datasets for calibration workflows: cached auxiliary-sample fits, the
//! fit-then-fix shape-parameter discipline, and the two-stage joint fit. The
//! binary (`massfit`) is a thin wrapper so the core stays testable without
//! spawning processes.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod params;
pub mod plot;

#[cfg(test)]
pub(crate) mod test_support;

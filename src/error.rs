//! Crate-wide error type.
//!
//! Every failure mode the fit orchestration can surface is a variant here so
//! callers can match on what went wrong instead of parsing messages:
//!
//! - `Config` / `MissingData` / `UnsupportedMethod` are caller mistakes and
//!   fail fast, before any minimization work is done.
//! - `Record` wraps I/O and JSON problems around cached fit records; a
//!   partially written record from a racing run shows up here.
//! - `Minimization` covers non-convergence and numerically invalid likelihoods.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration section is absent for the requested operation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A fit was requested but no input dataset/column was supplied.
    #[error("missing data: {0}")]
    MissingData(String),

    /// An error-estimation method other than `minuit_hesse` was requested.
    #[error("unsupported error method '{0}', only 'minuit_hesse' is implemented")]
    UnsupportedMethod(String),

    /// Reading or writing a persisted fit record failed.
    #[error("fit record '{}': {message}", path.display())]
    Record { path: PathBuf, message: String },

    /// The minimizer or the Hessian error pass failed.
    #[error("minimization error: {0}")]
    Minimization(String),

    /// Rendering or saving a diagnostic plot failed.
    #[error("plot error: {0}")]
    Plot(String),
}

impl Error {
    pub fn record(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Record {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

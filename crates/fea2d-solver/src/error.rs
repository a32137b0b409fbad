//! Error types for fea2d-solver

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while defining or solving a model.
///
/// Every variant is fatal for the run that produced it; the front end decides
/// whether to abort or report and continue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid element type, material, key option or real constant setup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A referenced entity (element type, boundary condition) does not exist.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Zero pivot, singular Jacobian or another arithmetic breakdown.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Operation called in a model state that does not allow it.
    #[error("precondition error: {0}")]
    Precondition(String),

    /// Operand shapes do not agree.
    #[error("dimension mismatch in {operation}: {left:?} vs {right:?}")]
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub(crate) fn lookup(message: impl Into<String>) -> Self {
        Error::Lookup(message.into())
    }

    pub(crate) fn numerical(message: impl Into<String>) -> Self {
        Error::Numerical(message.into())
    }

    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Error::Precondition(message.into())
    }
}

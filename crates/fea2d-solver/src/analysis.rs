//! Analysis configuration.
//!
//! The script `SOLVE` command passes two integer codes:
//!
//! | physics | solver | meaning                        |
//! |---------|--------|--------------------------------|
//! | 0       | 0      | static analysis, dense direct  |
//! | 0       | 1      | static analysis, sparse direct |
//! | 1       | 0      | modal analysis                 |
//!
//! Only static/dense is implemented. Every other combination is accepted and
//! performs no work.

use std::fmt;

use serde::Serialize;

use crate::shape::SINGULAR_JACOBIAN_TOLERANCE;

/// Physics of the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhysicsType {
    /// Linear static (code 0)
    Static,
    /// Modal (code 1)
    Modal,
    /// Unrecognized code
    Other(i32),
}

impl PhysicsType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PhysicsType::Static,
            1 => PhysicsType::Modal,
            other => PhysicsType::Other(other),
        }
    }
}

/// Linear solver used for the assembled system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolverType {
    /// Dense Gaussian elimination (code 0)
    DenseDirect,
    /// Sparse direct (code 1)
    SparseDirect,
    /// Unrecognized code
    Other(i32),
}

impl SolverType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => SolverType::DenseDirect,
            1 => SolverType::SparseDirect,
            other => SolverType::Other(other),
        }
    }
}

/// Analysis configuration and control
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// Physics to solve for
    pub physics: PhysicsType,
    /// Linear solver
    pub solver: SolverType,
    /// Relative threshold for rejecting a singular element Jacobian
    pub jacobian_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsType::Static,
            solver: SolverType::DenseDirect,
            jacobian_tolerance: SINGULAR_JACOBIAN_TOLERANCE,
        }
    }
}

impl AnalysisConfig {
    /// Configuration from the integer codes of the `SOLVE` command
    pub fn from_codes(physics: i32, solver: i32) -> Self {
        Self {
            physics: PhysicsType::from_code(physics),
            solver: SolverType::from_code(solver),
            ..Self::default()
        }
    }

    /// Whether this combination performs any work
    pub fn is_supported(&self) -> bool {
        matches!(
            (self.physics, self.solver),
            (PhysicsType::Static, SolverType::DenseDirect)
        )
    }
}

impl fmt::Display for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} physics, {:?} solver", self.physics, self.solver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_static_dense() {
        let config = AnalysisConfig::default();
        assert_eq!(config, AnalysisConfig::from_codes(0, 0));
        assert!(config.is_supported());
        assert_eq!(config.jacobian_tolerance, 1e-12);
    }

    #[test]
    fn other_combinations_are_unsupported() {
        for (p, s) in [(0, 1), (1, 0), (2, 0), (0, 7), (-1, -1)] {
            assert!(!AnalysisConfig::from_codes(p, s).is_supported(), "({p}, {s})");
        }
        assert_eq!(PhysicsType::from_code(5), PhysicsType::Other(5));
        assert_eq!(SolverType::from_code(1), SolverType::SparseDirect);
    }
}

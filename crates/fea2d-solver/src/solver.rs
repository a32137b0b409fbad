//! Dense static solver.
//!
//! Assembles the free-dof system and reduces it in place with Gaussian
//! elimination (no pivoting). The solution keeps the equation map so results
//! can be looked up per (node, dof).

use log::{debug, info};
use serde::Serialize;

use crate::assembly::{EquationMap, GlobalSystem};
use crate::boundary_conditions::BoundaryConditions;
use crate::element_types::ElementTypeRegistry;
use crate::error::Result;
use crate::linalg::{self, Vector};
use crate::mesh::Mesh;

/// Result of a static solve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticSolution {
    /// Numbering of the free equations
    pub equations: EquationMap,
    /// Displacements or potentials, one per free equation
    pub displacements: Vector,
}

impl StaticSolution {
    /// Solved value of (node, dof); `None` when the dof is constrained
    pub fn value(&self, node: usize, dof: usize) -> Option<f64> {
        self.equations
            .equation(node, dof)
            .map(|eq| self.displacements[eq])
    }

    pub fn dofs_per_node(&self) -> usize {
        self.equations.dofs_per_node()
    }
}

/// Assemble and solve `K · U = F` with dense Gaussian elimination
pub fn dense_static_solve(
    mesh: &Mesh,
    types: &ElementTypeRegistry,
    bcs: &BoundaryConditions,
    dofs_per_node: usize,
    tolerance: f64,
) -> Result<StaticSolution> {
    let GlobalSystem {
        mut stiffness,
        force,
        equations,
    } = GlobalSystem::assemble(mesh, types, bcs, dofs_per_node, tolerance)?;

    let mut displacements = force;
    linalg::gauss_solve(&mut stiffness, &mut displacements)?;
    info!("solved {} equations", equations.num_free());
    debug!("solution vector:{displacements}");

    Ok(StaticSolution {
        equations,
        displacements,
    })
}

//! Element stiffness formulations.
//!
//! One module per formulation, dispatched on [`ElementFamily`]:
//!
//! - `truss`: SSPRING, SBAR (closed form, rotated axial member)
//! - `resistance`: TRESISTANCE (closed form conductance link)
//! - `triangle`: SPLANE3, TPLANE3 (closed form linear triangle)
//! - `quad`: SPLANE4, SPLANE8, TPLANE4, TPLANE8 (Gauss quadrature)
//!
//! SBEAM, SPLANE6 and TPLANE6 are registered families without a stiffness
//! formulation.

pub mod quad;
pub mod resistance;
pub mod triangle;
pub mod truss;

use crate::element_types::{ElementFamily, ElementType, SolverData};
use crate::error::{Error, Result};
use crate::linalg::Matrix;

fn prepared(et: &ElementType) -> Result<&SolverData> {
    et.solver_data().ok_or_else(|| {
        Error::precondition(format!(
            "element type {} has not been prepared for solving",
            et.user_id()
        ))
    })
}

/// Element stiffness matrix in global axes.
///
/// `coords` is the `2 × nodes` coordinate matrix of the element in
/// connectivity order. Quadrilaterals and triangles read the type's solver
/// cache, so [`ElementType::prepare`] must have run first.
pub fn stiffness_matrix(et: &ElementType, coords: &Matrix, tolerance: f64) -> Result<Matrix> {
    let expected = (2, et.num_nodes());
    if coords.shape() != expected {
        return Err(Error::DimensionMismatch {
            operation: "element coordinates",
            left: coords.shape(),
            right: expected,
        });
    }

    match et.family() {
        ElementFamily::Spring => truss::spring_stiffness(et, coords),
        ElementFamily::Bar => truss::bar_stiffness(et, coords),
        ElementFamily::ThermalResistance => resistance::stiffness(et, coords),
        ElementFamily::PlaneTri3 | ElementFamily::ThermalTri3 => {
            triangle::stiffness(et, prepared(et)?, coords)
        }
        ElementFamily::PlaneQuad4
        | ElementFamily::PlaneQuad8
        | ElementFamily::ThermalQuad4
        | ElementFamily::ThermalQuad8 => quad::stiffness(et, prepared(et)?, coords, tolerance),
        family @ (ElementFamily::Beam | ElementFamily::PlaneTri6 | ElementFamily::ThermalTri6) => {
            Err(Error::configuration(format!(
                "element family {family} has no stiffness formulation"
            )))
        }
    }
}

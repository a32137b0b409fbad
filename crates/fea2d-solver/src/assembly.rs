//! Global matrix assembly.
//!
//! ## Assembly Process
//!
//! 1. Number the free equations ([`EquationMap::build`]).
//! 2. Loop over all elements in creation order:
//!    - compute the element stiffness `k_e`
//!    - scatter-add free/free entries into K
//!    - move free/constrained entries into F as `-k_e[p][q] · ū_q`
//!      (static condensation of the prescribed values)
//! 3. Add the nodal forces of every free dof into F.
//!
//! K and F are dense and sized by the number of free equations only.

use std::fmt;

use log::{debug, info};
use serde::Serialize;

use crate::boundary_conditions::BoundaryConditions;
use crate::element_types::ElementTypeRegistry;
use crate::elements;
use crate::error::{Error, Result};
use crate::linalg::{Matrix, Vector};
use crate::mesh::Mesh;

/// Node/dof to free-equation table.
///
/// Equations are numbered by scanning nodes in ascending id and, within a
/// node, dofs in ascending order, skipping constrained cells. This ordering
/// fixes the layout of K, F and U.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationMap {
    num_nodes: usize,
    dofs_per_node: usize,
    cells: Vec<Option<usize>>,
    num_free: usize,
}

impl EquationMap {
    pub fn build(num_nodes: usize, dofs_per_node: usize, bcs: &BoundaryConditions) -> Self {
        let mut cells = Vec::with_capacity(num_nodes * dofs_per_node);
        let mut next = 0;
        for node in 0..num_nodes {
            for dof in 0..dofs_per_node {
                if bcs.is_constrained(node, dof) {
                    cells.push(None);
                } else {
                    cells.push(Some(next));
                    next += 1;
                }
            }
        }
        Self {
            num_nodes,
            dofs_per_node,
            cells,
            num_free: next,
        }
    }

    /// Free equation index of (node, dof), `None` when constrained or out of range
    pub fn equation(&self, node: usize, dof: usize) -> Option<usize> {
        if node >= self.num_nodes || dof >= self.dofs_per_node {
            return None;
        }
        self.cells[node * self.dofs_per_node + dof]
    }

    pub fn num_free(&self) -> usize {
        self.num_free
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn dofs_per_node(&self) -> usize {
        self.dofs_per_node
    }
}

impl fmt::Display for EquationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in 0..self.num_nodes {
            for dof in 0..self.dofs_per_node {
                match self.equation(node, dof) {
                    Some(eq) => write!(f, "{eq:>4}")?,
                    None => write!(f, "{:>4}", -1)?,
                }
            }
            if node + 1 < self.num_nodes {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Assembled free-dof system `K · U = F`
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    /// Global stiffness (free × free)
    pub stiffness: Matrix,
    /// Load vector including condensed prescribed values
    pub force: Vector,
    /// Equation numbering used for K and F
    pub equations: EquationMap,
}

impl GlobalSystem {
    /// Assemble the global system.
    ///
    /// Every element type must share `dofs_per_node` and integrated types
    /// must have been prepared.
    pub fn assemble(
        mesh: &Mesh,
        types: &ElementTypeRegistry,
        bcs: &BoundaryConditions,
        dofs_per_node: usize,
        tolerance: f64,
    ) -> Result<Self> {
        let equations = EquationMap::build(mesh.num_nodes(), dofs_per_node, bcs);
        debug!("equation map:\n{equations}");
        let n = equations.num_free();
        let mut system = Self {
            stiffness: Matrix::zeros(n, n),
            force: Vector::zeros(n),
            equations,
        };

        system.assemble_stiffness(mesh, types, bcs, tolerance)?;
        system.assemble_forces(bcs);
        info!(
            "assembled {} elements into {} free equations",
            mesh.num_elements(),
            n
        );
        debug!("stiffness matrix:{}", system.stiffness);
        debug!("force vector:{}", system.force);
        Ok(system)
    }

    fn assemble_stiffness(
        &mut self,
        mesh: &Mesh,
        types: &ElementTypeRegistry,
        bcs: &BoundaryConditions,
        tolerance: f64,
    ) -> Result<()> {
        let ndof = self.equations.dofs_per_node();
        for (index, element) in mesh.elements().iter().enumerate() {
            let et = types.require(element.type_id())?;
            if et.dofs_per_node() != ndof {
                return Err(Error::configuration(format!(
                    "element {index} has {} dof per node, model uses {ndof}",
                    et.dofs_per_node()
                )));
            }
            let coords = mesh.coordinates(element);
            let k_e = elements::stiffness_matrix(et, &coords, tolerance)?;
            debug!("element {index} stiffness:{k_e}");
            self.scatter(&k_e, element.connectivity(), bcs)?;
        }
        Ok(())
    }

    /// Add one element matrix, condensing constrained columns into F
    fn scatter(
        &mut self,
        k_e: &Matrix,
        connectivity: &[usize],
        bcs: &BoundaryConditions,
    ) -> Result<()> {
        let ndof = self.equations.dofs_per_node();
        for (i, &row_node) in connectivity.iter().enumerate() {
            for a in 0..ndof {
                let Some(row) = self.equations.equation(row_node, a) else {
                    continue;
                };
                let p = i * ndof + a;
                for (j, &col_node) in connectivity.iter().enumerate() {
                    for b in 0..ndof {
                        let q = j * ndof + b;
                        match self.equations.equation(col_node, b) {
                            Some(col) => self.stiffness[(row, col)] += k_e[(p, q)],
                            None => {
                                let g = bcs.prescribed_value(col_node, b).ok_or_else(|| {
                                    Error::lookup(format!(
                                        "no boundary condition found for node {col_node} at dof {b}"
                                    ))
                                })?;
                                self.force[row] -= k_e[(p, q)] * g;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn assemble_forces(&mut self, bcs: &BoundaryConditions) {
        for node in 0..self.equations.num_nodes() {
            for dof in 0..self.equations.dofs_per_node() {
                if let Some(eq) = self.equations.equation(node, dof) {
                    self.force[eq] += bcs.nodal_force(node, dof);
                }
            }
        }
    }
}

//! Boundary conditions and nodal loading.
//!
//! Essential conditions and nodal forces are kept as ordered lists. Lookups
//! return the first matching entry, so a later duplicate on the same
//! (node, dof) never overrides an earlier one.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// Nodal component named in a boundary condition or load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Component {
    /// dof 0
    X,
    /// dof 1
    Y,
    /// both dofs; valid for essential conditions only
    All,
}

impl Component {
    /// Dof indices covered by this component
    pub fn dofs(&self) -> &'static [usize] {
        match self {
            Component::X => &[0],
            Component::Y => &[1],
            Component::All => &[0, 1],
        }
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "X" => Ok(Component::X),
            "Y" => Ok(Component::Y),
            "ALL" => Ok(Component::All),
            other => Err(Error::configuration(format!(
                "unknown component '{other}' (expected X, Y or ALL)"
            ))),
        }
    }
}

/// Prescribed value on one (node, dof)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EssentialBc {
    pub node: usize,
    pub dof: usize,
    pub value: f64,
}

impl fmt::Display for EssentialBc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Essential boundary condition: Node={}, Dof={}, Value={}",
            self.node, self.dof, self.value
        )
    }
}

/// Applied load on one (node, dof)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodalForce {
    pub node: usize,
    pub dof: usize,
    pub value: f64,
}

impl fmt::Display for NodalForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nodal force: Node={}, Dof={}, Value={}",
            self.node, self.dof, self.value
        )
    }
}

/// All essential conditions and nodal forces of a model
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoundaryConditions {
    essential: Vec<EssentialBc>,
    forces: Vec<NodalForce>,
}

impl BoundaryConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prescribed value; `ALL` adds one entry per dof (0 then 1).
    ///
    /// Returns the entries that were appended.
    pub fn add_essential(
        &mut self,
        node: usize,
        component: Component,
        value: f64,
    ) -> &[EssentialBc] {
        let start = self.essential.len();
        for &dof in component.dofs() {
            self.essential.push(EssentialBc { node, dof, value });
        }
        &self.essential[start..]
    }

    /// Add a nodal force on a single dof
    pub fn add_force(&mut self, node: usize, component: Component, value: f64) -> Result<NodalForce> {
        let dof = match component {
            Component::X => 0,
            Component::Y => 1,
            Component::All => {
                return Err(Error::configuration(
                    "nodal forces must name a single component (X or Y)",
                ));
            }
        };
        let force = NodalForce { node, dof, value };
        self.forces.push(force);
        Ok(force)
    }

    pub fn essential(&self) -> &[EssentialBc] {
        &self.essential
    }

    pub fn forces(&self) -> &[NodalForce] {
        &self.forces
    }

    /// Value of the first essential condition on (node, dof)
    pub fn prescribed_value(&self, node: usize, dof: usize) -> Option<f64> {
        self.essential
            .iter()
            .find(|bc| bc.node == node && bc.dof == dof)
            .map(|bc| bc.value)
    }

    pub fn is_constrained(&self, node: usize, dof: usize) -> bool {
        self.prescribed_value(node, dof).is_some()
    }

    /// Load on (node, dof): first match, zero when absent
    pub fn nodal_force(&self, node: usize, dof: usize) -> f64 {
        self.forces
            .iter()
            .find(|f| f.node == node && f.dof == dof)
            .map_or(0.0, |f| f.value)
    }
}

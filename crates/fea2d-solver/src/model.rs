//! The model: owner of the mesh, element types, boundary conditions and
//! solution, and the API the script front end drives.
//!
//! ## Lifecycle
//!
//! ```text
//! Built ──solve──▶ Solved ──finish──▶ Finalized
//!   └───────────────finish──────────────┘
//! ```
//!
//! Definitions are only accepted while `Built`. A model is solved at most
//! once; results are available once `Solved`. After `finish` every call
//! fails with [`Error::Precondition`].

use log::{debug, info, warn};
use serde::Serialize;

use crate::analysis::AnalysisConfig;
use crate::boundary_conditions::{BoundaryConditions, Component};
use crate::element_types::{ElementType, ElementTypeRegistry};
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::postprocess::{self, NodalResult, ResultKind};
use crate::solver::{self, StaticSolution};

/// Lifecycle state of a [`Model`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelState {
    Built,
    Solved,
    Finalized,
}

/// A 2-D finite element model
#[derive(Debug, Clone)]
pub struct Model {
    mesh: Mesh,
    types: ElementTypeRegistry,
    bcs: BoundaryConditions,
    solution: Option<StaticSolution>,
    state: ModelState,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        info!("creating new model");
        Self {
            mesh: Mesh::new(),
            types: ElementTypeRegistry::new(),
            bcs: BoundaryConditions::new(),
            solution: None,
            state: ModelState::Built,
        }
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn element_types(&self) -> &ElementTypeRegistry {
        &self.types
    }

    pub fn boundary_conditions(&self) -> &BoundaryConditions {
        &self.bcs
    }

    pub fn solution(&self) -> Option<&StaticSolution> {
        self.solution.as_ref()
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.state {
            ModelState::Built => Ok(()),
            ModelState::Solved => Err(Error::precondition(
                "model has already been solved and can no longer be edited",
            )),
            ModelState::Finalized => Err(Error::precondition("model has been finished")),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == ModelState::Finalized {
            return Err(Error::precondition("model has been finished"));
        }
        Ok(())
    }

    /// Append a node; ids are sequential from 0
    pub fn create_node(&mut self, x: f64, y: f64) -> Result<usize> {
        self.ensure_editable()?;
        let id = self.mesh.add_node(x, y);
        debug!("created node {id} at ({x}, {y})");
        Ok(id)
    }

    /// Define an element type from a library family name
    pub fn create_element_type(&mut self, user_id: usize, family_name: &str) -> Result<&ElementType> {
        self.ensure_editable()?;
        debug!("creating element type {family_name} with id {user_id}");
        self.types.define(user_id, family_name)
    }

    pub fn set_key_option(&mut self, type_id: usize, key: usize, option: i32) -> Result<()> {
        self.ensure_editable()?;
        self.types.require_mut(type_id)?.set_key_option(key, option)
    }

    pub fn set_real_constant(&mut self, type_id: usize, slot: usize, value: f64) -> Result<()> {
        self.ensure_editable()?;
        self.types.require_mut(type_id)?.set_real_constant(slot, value)
    }

    pub fn set_material_property(&mut self, type_id: usize, name: &str, value: f64) -> Result<()> {
        self.ensure_editable()?;
        self.types
            .require_mut(type_id)?
            .set_material_property(name, value)
    }

    /// Append an element of a defined type; returns its index
    pub fn create_element(&mut self, type_id: usize, connectivity: Vec<usize>) -> Result<usize> {
        self.ensure_editable()?;
        let nodes = self.types.require(type_id)?.num_nodes();
        let id = self.mesh.add_element(type_id, connectivity, nodes)?;
        debug!("created element {id} of type {type_id}");
        Ok(id)
    }

    /// Prescribe a value; `ALL` constrains both dofs
    pub fn add_essential_bc(&mut self, node: usize, component: Component, value: f64) -> Result<()> {
        self.ensure_editable()?;
        for bc in self.bcs.add_essential(node, component, value) {
            debug!("{bc}");
        }
        Ok(())
    }

    pub fn add_nodal_force(&mut self, node: usize, component: Component, value: f64) -> Result<()> {
        self.ensure_editable()?;
        let force = self.bcs.add_force(node, component, value)?;
        debug!("{force}");
        Ok(())
    }

    /// Solve with the integer physics/solver codes of the `SOLVE` command
    pub fn solve(&mut self, physics: i32, solver: i32) -> Result<()> {
        self.solve_with(AnalysisConfig::from_codes(physics, solver))
    }

    /// Solve the model.
    ///
    /// Unsupported physics/solver combinations are logged and leave the model
    /// untouched.
    pub fn solve_with(&mut self, config: AnalysisConfig) -> Result<()> {
        self.ensure_editable()?;
        if !config.is_supported() {
            warn!("{config} is not implemented; solve request ignored");
            return Ok(());
        }

        let dofs_per_node = self.dofs_per_node()?;
        info!(
            "solving model: {} nodes, {} elements, {} element types",
            self.mesh.num_nodes(),
            self.mesh.num_elements(),
            self.types.len()
        );
        self.types.prepare_all()?;
        info!("precomputation finished");

        let solution = solver::dense_static_solve(
            &self.mesh,
            &self.types,
            &self.bcs,
            dofs_per_node,
            config.jacobian_tolerance,
        )?;
        self.solution = Some(solution);
        self.state = ModelState::Solved;
        info!("finished solving");
        Ok(())
    }

    /// Dofs per node shared by every defined element type
    fn dofs_per_node(&self) -> Result<usize> {
        let mut iter = self.types.iter();
        let first = iter
            .next()
            .ok_or_else(|| Error::precondition("cannot solve a model with no element types"))?;
        let ndof = first.dofs_per_node();
        if let Some(other) = iter.find(|et| et.dofs_per_node() != ndof) {
            return Err(Error::configuration(format!(
                "element types {} and {} mix {} and {} dof per node",
                first.user_id(),
                other.user_id(),
                ndof,
                other.dofs_per_node()
            )));
        }
        Ok(ndof)
    }

    /// Per-node values of a named result
    pub fn result(&self, name: &str) -> Result<Vec<NodalResult>> {
        self.ensure_open()?;
        let solution = self
            .solution
            .as_ref()
            .ok_or_else(|| Error::precondition("no solution"))?;
        let kind: ResultKind = name.parse()?;
        postprocess::nodal_results(solution, kind)
    }

    /// Release the model; no further calls are accepted
    pub fn finish(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.solution = None;
        self.mesh = Mesh::new();
        self.types = ElementTypeRegistry::new();
        self.bcs = BoundaryConditions::new();
        self.state = ModelState::Finalized;
        info!("model finished");
        Ok(())
    }
}

//! Direct-stiffness finite element solver for 2-D models.
//!
//! Linear elastic (plane stress/strain, bars, springs) and steady thermal
//! (conduction) elements are assembled into a dense free-dof system and
//! solved by Gaussian elimination. [`Model`] is the entry point.

pub mod analysis;
pub mod assembly;
pub mod boundary_conditions;
pub mod element_types;
pub mod elements;
pub mod error;
pub mod linalg;
pub mod materials;
pub mod mesh;
pub mod model;
pub mod postprocess;
pub mod quadrature;
pub mod shape;
pub mod solver;

pub use analysis::{AnalysisConfig, PhysicsType, SolverType};
pub use assembly::{EquationMap, GlobalSystem};
pub use boundary_conditions::{BoundaryConditions, Component, EssentialBc, NodalForce};
pub use element_types::{
    ElementFamily, ElementType, ElementTypeRegistry, MaterialProperties, SolverData,
};
pub use error::{Error, Result};
pub use linalg::{Matrix, Vector};
pub use materials::PlaneIdealization;
pub use mesh::{Element, Mesh, Node};
pub use model::{Model, ModelState};
pub use postprocess::{format_nodal_results, nodal_results, DofValue, NodalResult, ResultKind};
pub use quadrature::{GaussPoint, IntegrationOrder};
pub use solver::{dense_static_solve, StaticSolution};

//! Element-type registry.
//!
//! An [`ElementType`] binds a user id to a library [`ElementFamily`] and
//! carries the per-type inputs (key options, real constants, material
//! properties) plus the [`SolverData`] snapshot computed once before the
//! first solve and shared by every element of that type.
//!
//! Library ids follow the APDL-style numbering of the script front end:
//!
//! | id | name        | nodes | dof/node |
//! |----|-------------|-------|----------|
//! | 0  | SSPRING     | 2     | 2        |
//! | 1  | SBAR        | 2     | 2        |
//! | 2  | SBEAM       | 2     | 2        |
//! | 3  | SPLANE3     | 3     | 2        |
//! | 4  | SPLANE4     | 4     | 2        |
//! | 6  | SPLANE6     | 6     | 2        |
//! | 8  | SPLANE8     | 8     | 2        |
//! | 10 | TRESISTANCE | 2     | 1        |
//! | 13 | TPLANE3     | 3     | 1        |
//! | 14 | TPLANE4     | 4     | 1        |
//! | 16 | TPLANE6     | 6     | 1        |
//! | 18 | TPLANE8     | 8     | 1        |

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::linalg::Matrix;
use crate::materials;
use crate::quadrature::{self, GaussPoint, IntegrationOrder};
use crate::shape;

/// Number of key-option and real-constant slots per element type.
pub const MAX_SLOTS: usize = 10;

/// Library element family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementFamily {
    /// 2-node structural spring
    Spring,
    /// 2-node structural bar (truss)
    Bar,
    /// 2-node structural beam
    Beam,
    /// 3-node structural triangle
    PlaneTri3,
    /// 4-node structural bilinear quadrilateral
    PlaneQuad4,
    /// 6-node structural triangle
    PlaneTri6,
    /// 8-node structural serendipity quadrilateral
    PlaneQuad8,
    /// 2-node thermal resistance link
    ThermalResistance,
    /// 3-node thermal triangle
    ThermalTri3,
    /// 4-node thermal bilinear quadrilateral
    ThermalQuad4,
    /// 6-node thermal triangle
    ThermalTri6,
    /// 8-node thermal serendipity quadrilateral
    ThermalQuad8,
}

impl ElementFamily {
    pub const ALL: [ElementFamily; 12] = [
        ElementFamily::Spring,
        ElementFamily::Bar,
        ElementFamily::Beam,
        ElementFamily::PlaneTri3,
        ElementFamily::PlaneQuad4,
        ElementFamily::PlaneTri6,
        ElementFamily::PlaneQuad8,
        ElementFamily::ThermalResistance,
        ElementFamily::ThermalTri3,
        ElementFamily::ThermalQuad4,
        ElementFamily::ThermalTri6,
        ElementFamily::ThermalQuad8,
    ];

    /// Resolve a library family from its name (exact, upper case)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|family| family.name() == name)
    }

    /// Library name as used by the script front end
    pub fn name(&self) -> &'static str {
        match self {
            ElementFamily::Spring => "SSPRING",
            ElementFamily::Bar => "SBAR",
            ElementFamily::Beam => "SBEAM",
            ElementFamily::PlaneTri3 => "SPLANE3",
            ElementFamily::PlaneQuad4 => "SPLANE4",
            ElementFamily::PlaneTri6 => "SPLANE6",
            ElementFamily::PlaneQuad8 => "SPLANE8",
            ElementFamily::ThermalResistance => "TRESISTANCE",
            ElementFamily::ThermalTri3 => "TPLANE3",
            ElementFamily::ThermalQuad4 => "TPLANE4",
            ElementFamily::ThermalTri6 => "TPLANE6",
            ElementFamily::ThermalQuad8 => "TPLANE8",
        }
    }

    /// Numeric library id (structural 0–9, thermal 10–19)
    pub fn library_id(&self) -> u8 {
        match self {
            ElementFamily::Spring => 0,
            ElementFamily::Bar => 1,
            ElementFamily::Beam => 2,
            ElementFamily::PlaneTri3 => 3,
            ElementFamily::PlaneQuad4 => 4,
            ElementFamily::PlaneTri6 => 6,
            ElementFamily::PlaneQuad8 => 8,
            ElementFamily::ThermalResistance => 10,
            ElementFamily::ThermalTri3 => 13,
            ElementFamily::ThermalQuad4 => 14,
            ElementFamily::ThermalTri6 => 16,
            ElementFamily::ThermalQuad8 => 18,
        }
    }

    /// Nodes per element
    pub fn num_nodes(&self) -> usize {
        match self {
            ElementFamily::Spring
            | ElementFamily::Bar
            | ElementFamily::Beam
            | ElementFamily::ThermalResistance => 2,
            ElementFamily::PlaneTri3 | ElementFamily::ThermalTri3 => 3,
            ElementFamily::PlaneQuad4 | ElementFamily::ThermalQuad4 => 4,
            ElementFamily::PlaneTri6 | ElementFamily::ThermalTri6 => 6,
            ElementFamily::PlaneQuad8 | ElementFamily::ThermalQuad8 => 8,
        }
    }

    /// Structural families carry displacements, thermal families potentials
    pub fn is_structural(&self) -> bool {
        self.library_id() < 10
    }

    /// Degrees of freedom per node: x/y displacement or a single potential
    pub fn dofs_per_node(&self) -> usize {
        if self.is_structural() { 2 } else { 1 }
    }

    /// Whether the stiffness is computed by Gauss quadrature.
    ///
    /// Only the quadrilateral families are; lines and triangles use closed
    /// forms.
    pub fn is_integrated(&self) -> bool {
        matches!(
            self,
            ElementFamily::PlaneQuad4
                | ElementFamily::PlaneQuad8
                | ElementFamily::ThermalQuad4
                | ElementFamily::ThermalQuad8
        )
    }

    /// Whether the type keeps a [`SolverData`] snapshot: the integrated
    /// quadrilaterals plus the linear triangles, which cache only D
    pub fn uses_solver_data(&self) -> bool {
        self.is_integrated()
            || matches!(self, ElementFamily::PlaneTri3 | ElementFamily::ThermalTri3)
    }
}

impl fmt::Display for ElementFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Material properties of an element type; zero until set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MaterialProperties {
    /// Young's modulus (E)
    pub elastic_modulus: f64,
    /// Poisson's ratio (V)
    pub poissons_ratio: f64,
    /// Isotropic conductivity (K)
    pub conductivity: f64,
}

/// Per-type data shared by all elements of one type.
///
/// Built once by [`SolverData::precompute`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverData {
    /// Integration points with weights
    pub points: Vec<GaussPoint>,
    /// Natural-coordinate shape derivatives (nodes × 2), one per point
    pub natural_derivatives: Vec<Matrix>,
    /// Constitutive matrix
    pub constitutive: Matrix,
}

impl SolverData {
    /// Compute the snapshot for an element type.
    ///
    /// Closed-form families get no integration points.
    pub fn precompute(et: &ElementType) -> Result<Self> {
        let family = et.family();
        let (points, natural_derivatives) = if family.is_integrated() {
            let order = IntegrationOrder::from_key_option(et.key_option(0));
            let points = quadrature::gauss_points(family, order)?;
            let natural_derivatives = points
                .iter()
                .map(|p| shape::natural_derivatives(family, p.xi, p.eta))
                .collect::<Result<Vec<_>>>()?;
            (points, natural_derivatives)
        } else {
            (Vec::new(), Vec::new())
        };
        let constitutive = materials::constitutive_matrix(et)?;
        Ok(Self {
            points,
            natural_derivatives,
            constitutive,
        })
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}

/// User-defined element type
#[derive(Debug, Clone, PartialEq)]
pub struct ElementType {
    user_id: usize,
    family: ElementFamily,
    key_options: [i32; MAX_SLOTS],
    real_constants: [f64; MAX_SLOTS],
    material: MaterialProperties,
    solver_data: Option<SolverData>,
}

impl ElementType {
    /// Create a type from a library family name
    pub fn new(user_id: usize, family_name: &str) -> Result<Self> {
        let family = ElementFamily::from_name(family_name).ok_or_else(|| {
            Error::configuration(format!("unknown element family '{family_name}'"))
        })?;
        Ok(Self::with_family(user_id, family))
    }

    pub fn with_family(user_id: usize, family: ElementFamily) -> Self {
        Self {
            user_id,
            family,
            key_options: [0; MAX_SLOTS],
            real_constants: [0.0; MAX_SLOTS],
            material: MaterialProperties::default(),
            solver_data: None,
        }
    }

    pub fn user_id(&self) -> usize {
        self.user_id
    }

    pub fn family(&self) -> ElementFamily {
        self.family
    }

    pub fn num_nodes(&self) -> usize {
        self.family.num_nodes()
    }

    pub fn dofs_per_node(&self) -> usize {
        self.family.dofs_per_node()
    }

    pub fn key_option(&self, key: usize) -> i32 {
        self.key_options.get(key).copied().unwrap_or(0)
    }

    pub fn key_options(&self) -> &[i32; MAX_SLOTS] {
        &self.key_options
    }

    pub fn real_constant(&self, slot: usize) -> f64 {
        self.real_constants.get(slot).copied().unwrap_or(0.0)
    }

    pub fn real_constants(&self) -> &[f64; MAX_SLOTS] {
        &self.real_constants
    }

    pub fn material(&self) -> &MaterialProperties {
        &self.material
    }

    /// Real constant that must have been set (positive) before solving
    pub fn required_constant(&self, slot: usize, what: &str) -> Result<f64> {
        let value = self.real_constant(slot);
        if value > 0.0 {
            Ok(value)
        } else {
            Err(Error::configuration(format!(
                "element type {} ({}) requires real constant {slot} ({what})",
                self.user_id, self.family
            )))
        }
    }

    /// Set a real constant; slot in `[0, 10)` and value strictly positive
    pub fn set_real_constant(&mut self, slot: usize, value: f64) -> Result<()> {
        if slot >= MAX_SLOTS {
            return Err(Error::configuration(format!(
                "real constant slot {slot} out of range [0, {MAX_SLOTS})"
            )));
        }
        if !(value > 0.0) {
            return Err(Error::configuration(format!(
                "real constant {slot} must be positive, got {value}"
            )));
        }
        self.real_constants[slot] = value;
        self.solver_data = None;
        Ok(())
    }

    /// Set a key option; key in `[0, 10)`
    pub fn set_key_option(&mut self, key: usize, option: i32) -> Result<()> {
        if key >= MAX_SLOTS {
            return Err(Error::configuration(format!(
                "key option {key} out of range [0, {MAX_SLOTS})"
            )));
        }
        self.key_options[key] = option;
        self.solver_data = None;
        Ok(())
    }

    /// Set a material property by name: `E`, `V` or `K`
    pub fn set_material_property(&mut self, name: &str, value: f64) -> Result<()> {
        match name {
            "E" => self.material.elastic_modulus = value,
            "V" => self.material.poissons_ratio = value,
            "K" => self.material.conductivity = value,
            _ => {
                return Err(Error::configuration(format!(
                    "unrecognized material property '{name}'"
                )));
            }
        }
        self.solver_data = None;
        Ok(())
    }

    /// Populate the solver cache if this family uses one and it is not yet built
    pub fn prepare(&mut self) -> Result<()> {
        if !self.family.uses_solver_data() || self.solver_data.is_some() {
            return Ok(());
        }
        let data = SolverData::precompute(self)?;
        debug!(
            "element type {}: {} integration points, D = {}",
            self.user_id,
            data.num_points(),
            data.constitutive
        );
        self.solver_data = Some(data);
        Ok(())
    }

    /// Cached integration data, present after [`ElementType::prepare`]
    pub fn solver_data(&self) -> Option<&SolverData> {
        self.solver_data.as_ref()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Element type id: {}", self.user_id)?;
        writeln!(f, "\tLibrary type: {} ({})", self.family, self.family.library_id())?;
        writeln!(f, "\tElement nodes: {}", self.num_nodes())?;
        writeln!(f, "\tDegrees of freedom: {}", self.dofs_per_node())?;
        write!(f, "\tElement key options:")?;
        for opt in &self.key_options {
            write!(f, " {opt}")?;
        }
        writeln!(f)?;
        write!(f, "\tElement constants:")?;
        for c in &self.real_constants {
            write!(f, " {c}")?;
        }
        writeln!(f)?;
        writeln!(f, "\tMaterial properties:")?;
        writeln!(f, "\t\tE = {}", self.material.elastic_modulus)?;
        writeln!(f, "\t\tv = {}", self.material.poissons_ratio)?;
        write!(f, "\t\tK = {}", self.material.conductivity)
    }
}

/// Element types of a model, looked up by user id
#[derive(Debug, Clone, Default)]
pub struct ElementTypeRegistry {
    types: Vec<ElementType>,
}

impl ElementTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new type; user ids must be unique
    pub fn define(&mut self, user_id: usize, family_name: &str) -> Result<&ElementType> {
        if self.get(user_id).is_some() {
            return Err(Error::configuration(format!(
                "element type {user_id} is already defined"
            )));
        }
        let et = ElementType::new(user_id, family_name)?;
        self.types.push(et);
        Ok(&self.types[self.types.len() - 1])
    }

    pub fn get(&self, user_id: usize) -> Option<&ElementType> {
        self.types.iter().find(|et| et.user_id == user_id)
    }

    pub fn get_mut(&mut self, user_id: usize) -> Option<&mut ElementType> {
        self.types.iter_mut().find(|et| et.user_id == user_id)
    }

    /// Like [`get`](Self::get) but a missing id is a lookup error
    pub fn require(&self, user_id: usize) -> Result<&ElementType> {
        self.get(user_id)
            .ok_or_else(|| Error::lookup(format!("element type {user_id} is not defined")))
    }

    pub fn require_mut(&mut self, user_id: usize) -> Result<&mut ElementType> {
        self.get_mut(user_id)
            .ok_or_else(|| Error::lookup(format!("element type {user_id} is not defined")))
    }

    /// Precomputation phase: fill the solver cache of every type that uses one
    pub fn prepare_all(&mut self) -> Result<()> {
        for et in &mut self.types {
            et.prepare()?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

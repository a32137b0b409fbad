//! Gauss quadrature rules for the integrated quadrilateral families.
//!
//! Points and weights are tabulated to five significant digits, not exact
//! values.

use serde::Serialize;

use crate::element_types::ElementFamily;
use crate::error::{Error, Result};

const A2: f64 = 0.57735;
const A3: f64 = 0.77460;
const W_CORNER: f64 = 0.30864;
const W_EDGE: f64 = 0.49383;
const W_CENTER: f64 = 0.79012;

/// A quadrature point in natural coordinates (ξ, η) with its weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaussPoint {
    pub xi: f64,
    pub eta: f64,
    pub weight: f64,
}

impl GaussPoint {
    pub const fn new(xi: f64, eta: f64, weight: f64) -> Self {
        Self { xi, eta, weight }
    }
}

/// Reduced or full integration, selected by key option 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntegrationOrder {
    Reduced,
    Full,
}

impl IntegrationOrder {
    /// `0` selects reduced integration, anything else full
    pub fn from_key_option(option: i32) -> Self {
        if option == 0 {
            IntegrationOrder::Reduced
        } else {
            IntegrationOrder::Full
        }
    }
}

fn one_point() -> Vec<GaussPoint> {
    vec![GaussPoint::new(0.0, 0.0, 4.0)]
}

fn two_by_two() -> Vec<GaussPoint> {
    vec![
        GaussPoint::new(-A2, -A2, 1.0),
        GaussPoint::new(A2, -A2, 1.0),
        GaussPoint::new(A2, A2, 1.0),
        GaussPoint::new(-A2, A2, 1.0),
    ]
}

fn three_by_three() -> Vec<GaussPoint> {
    vec![
        GaussPoint::new(-A3, -A3, W_CORNER),
        GaussPoint::new(0.0, -A3, W_EDGE),
        GaussPoint::new(A3, -A3, W_CORNER),
        GaussPoint::new(-A3, 0.0, W_EDGE),
        GaussPoint::new(0.0, 0.0, W_CENTER),
        GaussPoint::new(A3, 0.0, W_EDGE),
        GaussPoint::new(-A3, A3, W_CORNER),
        GaussPoint::new(0.0, A3, W_EDGE),
        GaussPoint::new(A3, A3, W_CORNER),
    ]
}

/// Integration points for an integrated family.
///
/// | family       | reduced | full |
/// |--------------|---------|------|
/// | 4-node quads | 1       | 4    |
/// | 8-node quads | 4       | 9    |
pub fn gauss_points(family: ElementFamily, order: IntegrationOrder) -> Result<Vec<GaussPoint>> {
    match (family, order) {
        (ElementFamily::PlaneQuad4 | ElementFamily::ThermalQuad4, IntegrationOrder::Reduced) => {
            Ok(one_point())
        }
        (ElementFamily::PlaneQuad4 | ElementFamily::ThermalQuad4, IntegrationOrder::Full) => {
            Ok(two_by_two())
        }
        (ElementFamily::PlaneQuad8 | ElementFamily::ThermalQuad8, IntegrationOrder::Reduced) => {
            Ok(two_by_two())
        }
        (ElementFamily::PlaneQuad8 | ElementFamily::ThermalQuad8, IntegrationOrder::Full) => {
            Ok(three_by_three())
        }
        _ => Err(Error::configuration(format!(
            "element family {family} is not numerically integrated"
        ))),
    }
}

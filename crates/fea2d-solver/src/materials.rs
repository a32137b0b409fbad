//! Constitutive matrices for the element-type material properties.
//!
//! Structural families use key option 1 to choose the 2-D idealization:
//!
//! - `0` plane stress:
//!   ```text
//!   D = E/(1-ν²) · [1  ν  0        ]
//!                  [ν  1  0        ]
//!                  [0  0  (1-ν)/2  ]
//!   ```
//! - `1` plane strain:
//!   ```text
//!   D = E/((1+ν)(1-2ν)) · [1-ν  ν    0     ]
//!                         [ν    1-ν  0     ]
//!                         [0    0    1-ν   ]
//!   ```
//!
//! Thermal families use isotropic conduction, `D = diag(K, K)`.

use serde::Serialize;

use crate::element_types::{ElementType, MaterialProperties};
use crate::error::{Error, Result};
use crate::linalg::Matrix;

/// 2-D structural idealization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaneIdealization {
    PlaneStress,
    PlaneStrain,
}

impl PlaneIdealization {
    /// Decode key option 1
    pub fn from_key_option(option: i32) -> Result<Self> {
        match option {
            0 => Ok(PlaneIdealization::PlaneStress),
            1 => Ok(PlaneIdealization::PlaneStrain),
            other => Err(Error::configuration(format!(
                "key option 1 must be 0 (plane stress) or 1 (plane strain), got {other}"
            ))),
        }
    }
}

/// 3×3 plane-stress matrix
pub fn plane_stress(material: &MaterialProperties) -> Result<Matrix> {
    let e = material.elastic_modulus;
    let nu = material.poissons_ratio;
    let denom = 1.0 - nu * nu;
    if denom == 0.0 {
        return Err(Error::numerical(format!(
            "plane stress is undefined for Poisson's ratio {nu}"
        )));
    }
    let factor = e / denom;
    let mut d = Matrix::from_row_slice(
        3,
        3,
        &[1.0, nu, 0.0, nu, 1.0, 0.0, 0.0, 0.0, (1.0 - nu) / 2.0],
    );
    d *= factor;
    Ok(d)
}

/// 3×3 plane-strain matrix
pub fn plane_strain(material: &MaterialProperties) -> Result<Matrix> {
    let e = material.elastic_modulus;
    let nu = material.poissons_ratio;
    let denom = (1.0 + nu) * (1.0 - 2.0 * nu);
    if denom == 0.0 {
        return Err(Error::numerical(format!(
            "plane strain is undefined for Poisson's ratio {nu}"
        )));
    }
    let factor = e / denom;
    let mut d = Matrix::from_row_slice(
        3,
        3,
        &[1.0 - nu, nu, 0.0, nu, 1.0 - nu, 0.0, 0.0, 0.0, 1.0 - nu],
    );
    d *= factor;
    Ok(d)
}

/// 2×2 isotropic conduction matrix
pub fn isotropic_conduction(material: &MaterialProperties) -> Matrix {
    let k = material.conductivity;
    Matrix::from_row_slice(2, 2, &[k, 0.0, 0.0, k])
}

/// Constitutive matrix for an element type
pub fn constitutive_matrix(et: &ElementType) -> Result<Matrix> {
    let material = et.material();
    if !et.family().is_structural() {
        return Ok(isotropic_conduction(material));
    }
    match PlaneIdealization::from_key_option(et.key_option(1))? {
        PlaneIdealization::PlaneStress => plane_stress(material),
        PlaneIdealization::PlaneStrain => plane_strain(material),
    }
}

//! 2-node thermal resistance link (TRESISTANCE).
//!
//! One potential per node. The link conducts through a prism of section A
//! (real constant 1) and length L with conductivity K:
//! ```text
//! K_e = (K·A/L) · [ 1 -1]
//!                 [-1  1]
//! ```

use crate::element_types::ElementType;
use crate::elements::truss::member_geometry;
use crate::error::Result;
use crate::linalg::Matrix;

pub fn stiffness(et: &ElementType, coords: &Matrix) -> Result<Matrix> {
    let (length, _, _) = member_geometry(coords)?;
    let area = et.required_constant(1, "conduction area")?;
    let conductance = et.material().conductivity * area / length;
    Ok(Matrix::from_row_slice(
        2,
        2,
        &[conductance, -conductance, -conductance, conductance],
    ))
}

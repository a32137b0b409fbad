//! 3-node linear triangles: SPLANE3 (constant strain) and TPLANE3.
//!
//! Shape-function gradients are constant over the element, so the stiffness
//! is evaluated in closed form:
//! ```text
//! K_e = t · A · Bᵀ D B
//! ```
//! with thickness t (real constant 1) and area A. For node i with opposite
//! vertices j, k (cyclic):
//! ```text
//! ∂Nᵢ/∂x = (yⱼ - yₖ) / 2A      ∂Nᵢ/∂y = (xₖ - xⱼ) / 2A
//! ```
//! using the signed area so clockwise node order still yields the correct
//! gradients.

use crate::element_types::{ElementType, SolverData};
use crate::error::{Error, Result};
use crate::linalg::Matrix;

/// Gradients (3 × 2, rows = nodes) and unsigned area
fn gradients(coords: &Matrix) -> Result<(Matrix, f64)> {
    let (x1, x2, x3) = (coords[(0, 0)], coords[(0, 1)], coords[(0, 2)]);
    let (y1, y2, y3) = (coords[(1, 0)], coords[(1, 1)], coords[(1, 2)]);

    let area_2_signed = (x2 - x1) * (y3 - y1) - (x3 - x1) * (y2 - y1);
    let scale = coords.amax();
    if area_2_signed.abs() <= 1e-12 * scale * scale {
        return Err(Error::numerical(format!(
            "degenerate triangle (2A = {area_2_signed:e})"
        )));
    }
    let inv_2a = 1.0 / area_2_signed;

    let g = Matrix::from_row_slice(
        3,
        2,
        &[
            (y2 - y3) * inv_2a,
            (x3 - x2) * inv_2a,
            (y3 - y1) * inv_2a,
            (x1 - x3) * inv_2a,
            (y1 - y2) * inv_2a,
            (x2 - x1) * inv_2a,
        ],
    );
    Ok((g, area_2_signed.abs() / 2.0))
}

fn structural_b(g: &Matrix) -> Matrix {
    let mut b = Matrix::zeros(3, 6);
    for i in 0..3 {
        let col = 2 * i;
        b[(0, col)] = g[(i, 0)];
        b[(1, col + 1)] = g[(i, 1)];
        b[(2, col)] = g[(i, 1)];
        b[(2, col + 1)] = g[(i, 0)];
    }
    b
}

fn thermal_b(g: &Matrix) -> Matrix {
    g.transpose()
}

/// Closed-form stiffness with the D matrix cached on the element type
pub fn stiffness(et: &ElementType, data: &SolverData, coords: &Matrix) -> Result<Matrix> {
    let thickness = et.required_constant(1, "thickness")?;
    let (g, area) = gradients(coords)?;
    let b = if et.family().is_structural() {
        structural_b(&g)
    } else {
        thermal_b(&g)
    };
    let db = &data.constitutive * &b;
    Ok(b.transpose() * db * (thickness * area))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::Vector;

    fn element_stiffness(et: &ElementType, coords: &Matrix) -> Result<Matrix> {
        stiffness(et, et.solver_data().unwrap(), coords)
    }

    fn right_triangle() -> Matrix {
        Matrix::from_row_slice(2, 3, &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    fn cst() -> ElementType {
        let mut et = ElementType::new(1, "SPLANE3").unwrap();
        et.set_material_property("E", 200e9).unwrap();
        et.set_material_property("V", 0.25).unwrap();
        et.set_real_constant(1, 0.01).unwrap();
        et.prepare().unwrap();
        et
    }

    #[test]
    fn gradients_of_unit_right_triangle() {
        let (g, area) = gradients(&right_triangle()).unwrap();
        assert!((area - 0.5).abs() < 1e-12);
        let expected = Matrix::from_row_slice(3, 2, &[-1.0, -1.0, 1.0, 0.0, 0.0, 1.0]);
        assert!((g - expected).amax() < 1e-12);
    }

    #[test]
    fn cst_is_symmetric_with_rigid_body_modes() {
        let k = element_stiffness(&cst(), &right_triangle()).unwrap();
        assert_eq!(k.shape(), (6, 6));
        assert!((&k - k.transpose()).amax() < 1e-6 * k.amax());

        let translation_x = Vector::from_vec(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        let translation_y = Vector::from_vec(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        // Infinitesimal rotation: u = -y, v = x
        let rotation = Vector::from_vec(vec![0.0, 0.0, 0.0, 1.0, -1.0, 0.0]);
        for mode in [translation_x, translation_y, rotation] {
            assert!((&k * mode).amax() < 1e-9 * k.amax());
        }
    }

    #[test]
    fn clockwise_ordering_gives_same_stiffness() {
        let ccw = element_stiffness(&cst(), &right_triangle()).unwrap();
        let cw_coords = Matrix::from_row_slice(2, 3, &[0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        let cw = element_stiffness(&cst(), &cw_coords).unwrap();
        // Swapping nodes 1 and 2 permutes the dof blocks
        assert!((ccw[(0, 0)] - cw[(0, 0)]).abs() < 1e-6 * ccw.amax());
        assert!((ccw[(2, 2)] - cw[(4, 4)]).abs() < 1e-6 * ccw.amax());
        assert!((ccw[(4, 5)] - cw[(2, 3)]).abs() < 1e-6 * ccw.amax());
    }

    #[test]
    fn thermal_triangle_conduction() {
        let mut et = ElementType::new(2, "TPLANE3").unwrap();
        et.set_material_property("K", 2.0).unwrap();
        et.set_real_constant(1, 1.0).unwrap();
        et.prepare().unwrap();
        let k = element_stiffness(&et, &right_triangle()).unwrap();
        // K · t · A · (gᵢ · gⱼ)
        let expected =
            Matrix::from_row_slice(3, 3, &[2.0, -1.0, -1.0, -1.0, 1.0, 0.0, -1.0, 0.0, 1.0]);
        assert!((k - expected).amax() < 1e-12);
    }

    #[test]
    fn collinear_nodes_are_rejected() {
        let coords = Matrix::from_row_slice(2, 3, &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert!(matches!(element_stiffness(&cst(), &coords), Err(Error::Numerical(_))));
    }
}

//! Isoparametric quadrilaterals: SPLANE4/TPLANE4 (bilinear) and
//! SPLANE8/TPLANE8 (serendipity).
//!
//! The stiffness is integrated with the Gauss rule cached on the element
//! type:
//! ```text
//! K_e[i,j] = t · Σ_gp  w · det J · Bᵢᵀ D Bⱼ
//! ```
//! where `[i,j]` is the dof block of local nodes i and j and t is real
//! constant 1.
//!
//! Per-node strain-displacement blocks:
//! ```text
//! structural (3×2):  [∂Nᵢ/∂x   0     ]      thermal (2×1):  [∂Nᵢ/∂x]
//!                    [0       ∂Nᵢ/∂y ]                      [∂Nᵢ/∂x]
//!                    [∂Nᵢ/∂y  ∂Nᵢ/∂x ]
//! ```
//! The thermal block repeats ∂Nᵢ/∂x in its second row instead of using
//! ∂Nᵢ/∂y. Results of existing thermal models depend on this form, so it is
//! kept as is; see DESIGN.md.

use crate::element_types::{ElementType, SolverData};
use crate::error::Result;
use crate::linalg::Matrix;
use crate::shape;

fn structural_block(global: &Matrix, node: usize) -> Matrix {
    let dx = global[(node, 0)];
    let dy = global[(node, 1)];
    Matrix::from_row_slice(3, 2, &[dx, 0.0, 0.0, dy, dy, dx])
}

fn thermal_block(global: &Matrix, node: usize) -> Matrix {
    let dx = global[(node, 0)];
    Matrix::from_row_slice(2, 1, &[dx, dx])
}

/// Integrated element stiffness using the type's precomputed data
pub fn stiffness(
    et: &ElementType,
    data: &SolverData,
    coords: &Matrix,
    tolerance: f64,
) -> Result<Matrix> {
    let nodes = et.num_nodes();
    let ndof = et.dofs_per_node();
    let structural = et.family().is_structural();
    let thickness = et.required_constant(1, "thickness")?;
    let d = &data.constitutive;

    let mut ke = Matrix::zeros(nodes * ndof, nodes * ndof);
    for (point, natural) in data.points.iter().zip(&data.natural_derivatives) {
        let (global, det) = shape::global_derivatives(coords, natural, tolerance)?;
        let blocks: Vec<Matrix> = (0..nodes)
            .map(|i| {
                if structural {
                    structural_block(&global, i)
                } else {
                    thermal_block(&global, i)
                }
            })
            .collect();

        let factor = point.weight * det;
        for (i, bi) in blocks.iter().enumerate() {
            let bi_t_d = bi.transpose() * d;
            for (j, bj) in blocks.iter().enumerate() {
                let kij = &bi_t_d * bj;
                for a in 0..ndof {
                    for b in 0..ndof {
                        ke[(i * ndof + a, j * ndof + b)] += factor * kij[(a, b)];
                    }
                }
            }
        }
    }
    ke *= thickness;
    Ok(ke)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::linalg::Vector;
    use crate::shape::SINGULAR_JACOBIAN_TOLERANCE;

    fn unit_square() -> Matrix {
        Matrix::from_row_slice(2, 4, &[0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0])
    }

    fn plane_type(family: &str, integration: i32) -> ElementType {
        let mut et = ElementType::new(1, family).unwrap();
        et.set_key_option(0, integration).unwrap();
        et.set_material_property("E", 30e6).unwrap();
        et.set_material_property("V", 0.3).unwrap();
        et.set_real_constant(1, 1.0).unwrap();
        et.prepare().unwrap();
        et
    }

    fn element_stiffness(et: &ElementType, coords: &Matrix) -> Result<Matrix> {
        stiffness(et, et.solver_data().unwrap(), coords, SINGULAR_JACOBIAN_TOLERANCE)
    }

    #[test]
    fn unit_square_plane_stress_full_integration() {
        let et = plane_type("SPLANE4", 1);
        let k = element_stiffness(&et, &unit_square()).unwrap();
        assert_eq!(k.shape(), (8, 8));
        for i in 0..8 {
            assert!(k[(i, i)] > 0.0);
            for j in 0..8 {
                assert!(
                    (k[(i, j)] - k[(j, i)]).abs() <= 1e-9 * k.amax(),
                    "k[{i},{j}] != k[{j},{i}]"
                );
            }
        }
        // Closed form for a square: E/(1-ν²) · (1/2 - ν/6)
        let k11 = 30e6 / 0.91 * (0.5 - 0.3 / 6.0);
        assert!((k[(0, 0)] - k11).abs() / k11 < 1e-4);
    }

    #[test]
    fn rigid_body_modes_produce_no_force() {
        let et = plane_type("SPLANE4", 1);
        let coords = Matrix::from_row_slice(2, 4, &[0.0, 2.0, 2.5, 0.2, 0.0, 0.3, 1.8, 1.5]);
        let k = element_stiffness(&et, &coords).unwrap();

        let tx = Vector::from_fn(8, |i, _| if i % 2 == 0 { 1.0 } else { 0.0 });
        let ty = Vector::from_fn(8, |i, _| if i % 2 == 1 { 1.0 } else { 0.0 });
        let rot = Vector::from_fn(8, |i, _| {
            let node = i / 2;
            if i % 2 == 0 { -coords[(1, node)] } else { coords[(0, node)] }
        });
        for mode in [tx, ty, rot] {
            assert!((&k * mode).amax() < 1e-6 * k.amax());
        }
    }

    #[test]
    fn stiffness_is_nonsingular_beyond_rigid_modes() {
        let et = plane_type("SPLANE4", 1);
        let k = element_stiffness(&et, &unit_square()).unwrap();
        // Fix node 0 fully and node 1 in y: removes the three rigid modes
        let free = [2, 4, 5, 6, 7];
        let mut reduced = Matrix::from_fn(5, 5, |i, j| k[(free[i], free[j])]);
        let mut rhs = Vector::from_element(5, 1.0);
        crate::linalg::gauss_solve(&mut reduced, &mut rhs).unwrap();
        assert!(rhs.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn thickness_scales_stiffness() {
        let thin = plane_type("SPLANE4", 1);
        let mut thick = thin.clone();
        thick.set_real_constant(1, 2.5).unwrap();
        thick.prepare().unwrap();
        let k1 = element_stiffness(&thin, &unit_square()).unwrap();
        let k2 = element_stiffness(&thick, &unit_square()).unwrap();
        assert!((&k2 - k1 * 2.5).amax() < 1e-9 * k2.amax());
    }

    #[test]
    fn reduced_integration_is_rank_deficient_but_symmetric() {
        let et = plane_type("SPLANE4", 0);
        assert_eq!(et.solver_data().unwrap().num_points(), 1);
        let k = element_stiffness(&et, &unit_square()).unwrap();
        assert!((&k - k.transpose()).amax() <= 1e-9 * k.amax());
        // Hourglass mode u = ξη along x carries no energy under 1-point rule
        let hourglass = Vector::from_vec(vec![1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0]);
        assert!((&k * hourglass).amax() < 1e-6 * k.amax());
    }

    #[test]
    fn thermal_block_uses_x_gradient_twice() {
        let mut et = ElementType::new(5, "TPLANE4").unwrap();
        et.set_key_option(0, 1).unwrap();
        et.set_material_property("K", 1.0).unwrap();
        et.set_real_constant(1, 1.0).unwrap();
        et.prepare().unwrap();
        let k = element_stiffness(&et, &unit_square()).unwrap();
        assert_eq!(k.shape(), (4, 4));
        // Uniform potential is a null mode
        assert!((&k * Vector::from_element(4, 1.0)).amax() < 1e-9);
        // A field varying only in y sees no stiffness with this block
        let y_field = Vector::from_vec(vec![0.0, 0.0, 1.0, 1.0]);
        assert!((&k * y_field).amax() < 1e-9);
    }

    #[test]
    fn serendipity_square_is_symmetric_with_translations() {
        let et = plane_type("SPLANE8", 1);
        assert_eq!(et.solver_data().unwrap().num_points(), 9);
        let coords = Matrix::from_row_slice(
            2,
            8,
            &[
                0.0, 2.0, 2.0, 0.0, 1.0, 2.0, 1.0, 0.0, //
                0.0, 0.0, 2.0, 2.0, 0.0, 1.0, 2.0, 1.0,
            ],
        );
        let k = element_stiffness(&et, &coords).unwrap();
        assert_eq!(k.shape(), (16, 16));
        assert!((&k - k.transpose()).amax() <= 1e-9 * k.amax());
        let tx = Vector::from_fn(16, |i, _| if i % 2 == 0 { 1.0 } else { 0.0 });
        assert!((&k * tx).amax() < 1e-6 * k.amax());
        assert!((0..16).all(|i| k[(i, i)] > 0.0));
    }

    #[test]
    fn degenerate_geometry_is_numerical_error() {
        let et = plane_type("SPLANE4", 1);
        let coords = Matrix::from_row_slice(2, 4, &[0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            element_stiffness(&et, &coords),
            Err(Error::Numerical(_))
        ));
    }

    #[test]
    fn clockwise_element_is_rejected() {
        let et = plane_type("SPLANE4", 1);
        let clockwise = Matrix::from_row_slice(2, 4, &[0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
        assert!(matches!(
            element_stiffness(&et, &clockwise),
            Err(Error::Numerical(ref msg)) if msg.contains("counter-clockwise")
        ));

        // Bow-tie: nodes 2 and 3 swapped, the Jacobian changes sign inside
        let folded = Matrix::from_row_slice(2, 4, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
        assert!(matches!(
            element_stiffness(&et, &folded),
            Err(Error::Numerical(_))
        ));
    }

    #[test]
    fn missing_thickness_is_configuration_error() {
        let mut et = ElementType::new(1, "SPLANE4").unwrap();
        et.set_material_property("E", 1.0).unwrap();
        et.prepare().unwrap();
        assert!(matches!(
            element_stiffness(&et, &unit_square()),
            Err(Error::Configuration(_))
        ));
    }
}

//! Shape-function derivatives and the isoparametric mapping.
//!
//! Natural-derivative matrices are `nodes × 2`: column 0 holds ∂Nᵢ/∂ξ and
//! column 1 holds ∂Nᵢ/∂η. Physical coordinates are passed as a `2 × nodes`
//! matrix (row 0 = x, row 1 = y, columns in connectivity order), so the
//! Jacobian is simply `coords · natural_derivatives`.

use crate::element_types::ElementFamily;
use crate::error::{Error, Result};
use crate::linalg::{self, Matrix};

/// Default relative threshold below which a Jacobian is treated as singular
pub const SINGULAR_JACOBIAN_TOLERANCE: f64 = 1e-12;

/// Bilinear 4-node quadrilateral, nodes counter-clockwise from (−1, −1)
fn quad4_natural_derivatives(xi: f64, eta: f64) -> Matrix {
    Matrix::from_row_slice(
        4,
        2,
        &[
            -0.25 * (1.0 - eta),
            -0.25 * (1.0 - xi),
            0.25 * (1.0 - eta),
            -0.25 * (1.0 + xi),
            0.25 * (1.0 + eta),
            0.25 * (1.0 + xi),
            -0.25 * (1.0 + eta),
            0.25 * (1.0 - xi),
        ],
    )
}

/// 8-node serendipity quadrilateral.
///
/// Corner nodes 0..4 counter-clockwise from (−1, −1), then mid-side nodes
/// (0, −1), (1, 0), (0, 1), (−1, 0).
fn quad8_natural_derivatives(xi: f64, eta: f64) -> Matrix {
    Matrix::from_row_slice(
        8,
        2,
        &[
            // corners
            0.25 * (1.0 - eta) * (2.0 * xi + eta),
            0.25 * (1.0 - xi) * (xi + 2.0 * eta),
            0.25 * (1.0 - eta) * (2.0 * xi - eta),
            0.25 * (1.0 + xi) * (2.0 * eta - xi),
            0.25 * (1.0 + eta) * (2.0 * xi + eta),
            0.25 * (1.0 + xi) * (xi + 2.0 * eta),
            0.25 * (1.0 + eta) * (2.0 * xi - eta),
            0.25 * (1.0 - xi) * (2.0 * eta - xi),
            // mid-side
            -xi * (1.0 - eta),
            -0.5 * (1.0 - xi * xi),
            0.5 * (1.0 - eta * eta),
            -(1.0 + xi) * eta,
            -xi * (1.0 + eta),
            0.5 * (1.0 - xi * xi),
            -0.5 * (1.0 - eta * eta),
            -(1.0 - xi) * eta,
        ],
    )
}

/// Shape-function derivatives in natural coordinates at (ξ, η)
pub fn natural_derivatives(family: ElementFamily, xi: f64, eta: f64) -> Result<Matrix> {
    match family {
        ElementFamily::PlaneQuad4 | ElementFamily::ThermalQuad4 => {
            Ok(quad4_natural_derivatives(xi, eta))
        }
        ElementFamily::PlaneQuad8 | ElementFamily::ThermalQuad8 => {
            Ok(quad8_natural_derivatives(xi, eta))
        }
        _ => Err(Error::configuration(format!(
            "no isoparametric shape functions for element family {family}"
        ))),
    }
}

/// Jacobian `J = coords · ∂N/∂(ξ,η)` (2×2)
pub fn jacobian(coords: &Matrix, natural: &Matrix) -> Result<Matrix> {
    if coords.nrows() != 2 {
        return Err(Error::DimensionMismatch {
            operation: "jacobian",
            left: coords.shape(),
            right: (2, natural.nrows()),
        });
    }
    linalg::multiply(coords, natural)
}

/// Global shape derivatives `∂N/∂(x,y)` (nodes × 2) and `det J`.
///
/// A Jacobian whose determinant is small relative to the squared size of its
/// entries is rejected as degenerate geometry. A negative determinant means
/// the nodes are listed clockwise or the element is folded, and is rejected
/// as well: `det J` is the area scale of the quadrature.
pub fn global_derivatives(
    coords: &Matrix,
    natural: &Matrix,
    tolerance: f64,
) -> Result<(Matrix, f64)> {
    let j = jacobian(coords, natural)?;
    let det = linalg::determinant_2x2(&j)?;
    let scale = j.amax();
    if !det.is_finite() || det.abs() <= tolerance * scale * scale {
        return Err(Error::numerical(format!(
            "singular Jacobian (det = {det:e}); element geometry is degenerate"
        )));
    }
    if det < 0.0 {
        return Err(Error::numerical(format!(
            "inverted element (det J = {det:e}); nodes must be ordered counter-clockwise"
        )));
    }
    let j_inv = linalg::inverse_2x2(&j)?;
    let global = linalg::multiply(natural, &j_inv)?;
    Ok((global, det))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Matrix {
        Matrix::from_row_slice(2, 4, &[0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0])
    }

    #[test]
    fn quad4_derivatives_at_gauss_point() {
        let d = natural_derivatives(ElementFamily::PlaneQuad4, -0.57735, -0.57735).unwrap();
        assert_eq!(d.shape(), (4, 2));
        let a = 0.25 * (1.0 + 0.57735);
        let b = 0.25 * (1.0 - 0.57735);
        assert!((d[(0, 0)] + a).abs() < 1e-12);
        assert!((d[(1, 0)] - a).abs() < 1e-12);
        assert!((d[(2, 0)] - b).abs() < 1e-12);
        assert!((d[(3, 0)] + b).abs() < 1e-12);
        assert!((d[(0, 1)] + a).abs() < 1e-12);
        assert!((d[(3, 1)] - a).abs() < 1e-12);
    }

    #[test]
    fn derivative_columns_sum_to_zero() {
        for family in [ElementFamily::PlaneQuad4, ElementFamily::ThermalQuad8] {
            for (xi, eta) in [(0.0, 0.0), (0.3, -0.7), (-0.77460, 0.77460)] {
                let d = natural_derivatives(family, xi, eta).unwrap();
                for col in 0..2 {
                    let sum: f64 = d.column(col).iter().sum();
                    assert!(sum.abs() < 1e-12, "{family} column {col} sums to {sum}");
                }
            }
        }
    }

    #[test]
    fn quad8_reproduces_linear_field() {
        // Nodes placed on the reference square so x = ξ: Σ xᵢ ∂Nᵢ/∂ξ = 1
        let xs = [-1.0, 1.0, 1.0, -1.0, 0.0, 1.0, 0.0, -1.0];
        let d = natural_derivatives(ElementFamily::PlaneQuad8, 0.4, -0.2).unwrap();
        let dx_dxi: f64 = (0..8).map(|i| xs[i] * d[(i, 0)]).sum();
        let dx_deta: f64 = (0..8).map(|i| xs[i] * d[(i, 1)]).sum();
        assert!((dx_dxi - 1.0).abs() < 1e-12);
        assert!(dx_deta.abs() < 1e-12);
    }

    #[test]
    fn closed_form_family_has_no_shape_derivatives() {
        assert!(natural_derivatives(ElementFamily::Bar, 0.0, 0.0).is_err());
        assert!(natural_derivatives(ElementFamily::PlaneTri3, 0.0, 0.0).is_err());
    }

    #[test]
    fn unit_square_jacobian_is_half_identity() {
        let d = natural_derivatives(ElementFamily::PlaneQuad4, 0.2, 0.1).unwrap();
        let j = jacobian(&unit_square(), &d).unwrap();
        assert!((j[(0, 0)] - 0.5).abs() < 1e-12);
        assert!((j[(1, 1)] - 0.5).abs() < 1e-12);
        assert!(j[(0, 1)].abs() < 1e-12);
        assert!(j[(1, 0)].abs() < 1e-12);
    }

    #[test]
    fn global_derivatives_scale_by_inverse_jacobian() {
        let d = natural_derivatives(ElementFamily::PlaneQuad4, 0.0, 0.0).unwrap();
        let (g, det) =
            global_derivatives(&unit_square(), &d, SINGULAR_JACOBIAN_TOLERANCE).unwrap();
        assert!((det - 0.25).abs() < 1e-12);
        // ∂N/∂x = 2 ∂N/∂ξ on the unit square
        for i in 0..4 {
            assert!((g[(i, 0)] - 2.0 * d[(i, 0)]).abs() < 1e-12);
            assert!((g[(i, 1)] - 2.0 * d[(i, 1)]).abs() < 1e-12);
        }
    }

    #[test]
    fn collapsed_element_has_singular_jacobian() {
        // All four nodes on a line
        let coords = Matrix::from_row_slice(2, 4, &[0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        let d = natural_derivatives(ElementFamily::PlaneQuad4, 0.0, 0.0).unwrap();
        let err = global_derivatives(&coords, &d, SINGULAR_JACOBIAN_TOLERANCE).unwrap_err();
        assert!(matches!(err, Error::Numerical(ref msg) if msg.contains("singular Jacobian")));
    }

    #[test]
    fn clockwise_ordering_is_rejected() {
        let coords = Matrix::from_row_slice(2, 4, &[0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
        let d = natural_derivatives(ElementFamily::PlaneQuad4, 0.0, 0.0).unwrap();
        let err = global_derivatives(&coords, &d, SINGULAR_JACOBIAN_TOLERANCE).unwrap_err();
        assert!(matches!(err, Error::Numerical(ref msg) if msg.contains("inverted element")));
    }

    #[test]
    fn jacobian_requires_planar_coordinates() {
        let coords = Matrix::zeros(3, 4);
        let d = natural_derivatives(ElementFamily::PlaneQuad4, 0.0, 0.0).unwrap();
        assert!(matches!(
            jacobian(&coords, &d),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}

//! 2-node axial members in the plane: bar (SBAR) and spring (SSPRING).
//!
//! Both resist only axial deformation and have 2 DOFs per node (ux, uy).
//!
//! ## Element Formulation
//!
//! Local stiffness, with k = E·A/L for the bar and k = real constant 1 for
//! the spring:
//! ```text
//! k_local = [ k  0 -k  0]
//!           [ 0  0  0  0]
//!           [-k  0  k  0]
//!           [ 0  0  0  0]
//! ```
//!
//! Global stiffness:
//! ```text
//! K = Rᵀ · k_local · R,   R = diag([c s; -s c], [c s; -s c])
//! ```
//! where (c, s) are the direction cosines from node 1 to node 2.

use crate::element_types::ElementType;
use crate::error::{Error, Result};
use crate::linalg::Matrix;

/// Length and direction cosines of a 2-node member
pub(crate) fn member_geometry(coords: &Matrix) -> Result<(f64, f64, f64)> {
    let dx = coords[(0, 1)] - coords[(0, 0)];
    let dy = coords[(1, 1)] - coords[(1, 0)];
    let length = (dx * dx + dy * dy).sqrt();
    if length < 1e-12 {
        return Err(Error::numerical(format!(
            "member has zero or near-zero length: {length}"
        )));
    }
    Ok((length, dx / length, dy / length))
}

/// Block-diagonal rotation from global to member axes
pub fn rotation(c: f64, s: f64) -> Matrix {
    let mut r = Matrix::zeros(4, 4);
    r[(0, 0)] = c;
    r[(0, 1)] = s;
    r[(1, 0)] = -s;
    r[(1, 1)] = c;
    r[(2, 2)] = c;
    r[(2, 3)] = s;
    r[(3, 2)] = -s;
    r[(3, 3)] = c;
    r
}

fn axial_local(k: f64) -> Matrix {
    let mut kp = Matrix::zeros(4, 4);
    kp[(0, 0)] = k;
    kp[(0, 2)] = -k;
    kp[(2, 0)] = -k;
    kp[(2, 2)] = k;
    kp
}

fn rotate(k: f64, c: f64, s: f64) -> Matrix {
    let r = rotation(c, s);
    let q = axial_local(k) * &r;
    r.transpose() * q
}

/// SBAR stiffness; real constant 1 is the cross-section area
pub fn bar_stiffness(et: &ElementType, coords: &Matrix) -> Result<Matrix> {
    let (length, c, s) = member_geometry(coords)?;
    let e = et.material().elastic_modulus;
    let area = et.required_constant(1, "cross-section area")?;
    Ok(rotate(e * area / length, c, s))
}

/// SSPRING stiffness; real constant 1 is the spring rate
pub fn spring_stiffness(et: &ElementType, coords: &Matrix) -> Result<Matrix> {
    let (_, c, s) = member_geometry(coords)?;
    let k = et.required_constant(1, "spring stiffness")?;
    Ok(rotate(k, c, s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::Vector;

    fn bar(e: f64, area: f64) -> ElementType {
        let mut et = ElementType::new(1, "SBAR").unwrap();
        et.set_material_property("E", e).unwrap();
        et.set_real_constant(1, area).unwrap();
        et
    }

    fn coords(x2: f64, y2: f64) -> Matrix {
        Matrix::from_row_slice(2, 2, &[0.0, x2, 0.0, y2])
    }

    #[test]
    fn horizontal_bar_couples_only_x() {
        let k = bar_stiffness(&bar(100.0, 1.0), &coords(2.0, 0.0)).unwrap();
        assert!((k[(0, 0)] - 50.0).abs() < 1e-12);
        assert!((k[(0, 2)] + 50.0).abs() < 1e-12);
        assert!(k[(1, 1)].abs() < 1e-12);
        assert!(k[(3, 3)].abs() < 1e-12);
    }

    #[test]
    fn inclined_bar_reference_values() {
        let k = bar_stiffness(&bar(2e11, 6e-4), &coords(1.03923, 0.6)).unwrap();
        // L ≈ 1.2 so k = E·A/L ≈ 1e8, c ≈ cos 30°, s = sin 30°
        let expected = [
            [7.5e7, 4.330127e7, -7.5e7, -4.330127e7],
            [4.330127e7, 2.5e7, -4.330127e7, -2.5e7],
            [-7.5e7, -4.330127e7, 7.5e7, 4.330127e7],
            [-4.330127e7, -2.5e7, 4.330127e7, 2.5e7],
        ];
        for i in 0..4 {
            for j in 0..4 {
                let rel = (k[(i, j)] - expected[i][j]).abs() / expected[i][j].abs();
                assert!(rel < 1e-4, "k[{i},{j}] = {} vs {}", k[(i, j)], expected[i][j]);
            }
        }
    }

    #[test]
    fn bar_is_symmetric_with_rigid_translation_null_space() {
        let (c, s) = (1.03923 / 1.2, 0.6 / 1.2);
        let k = bar_stiffness(&bar(2e11, 6e-4), &coords(1.03923, 0.6)).unwrap();
        assert!((&k - k.transpose()).amax() < 1e-6);

        let mode = Vector::from_vec(vec![c, s, c, s]);
        let f = &k * mode;
        assert!(f.amax() < 1e-6 * k.amax());

        // Pure x and y translations as well
        for mode in [vec![1.0, 0.0, 1.0, 0.0], vec![0.0, 1.0, 0.0, 1.0]] {
            let f = &k * Vector::from_vec(mode);
            assert!(f.amax() < 1e-6 * k.amax());
        }
    }

    #[test]
    fn rotation_is_orthogonal() {
        let r = rotation(0.6, 0.8);
        let rtr = r.transpose() * &r;
        assert!((rtr - Matrix::identity(4, 4)).amax() < 1e-12);
    }

    #[test]
    fn bar_requires_area() {
        let mut et = ElementType::new(1, "SBAR").unwrap();
        et.set_material_property("E", 1.0).unwrap();
        let err = bar_stiffness(&et, &coords(1.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("area")));
    }

    #[test]
    fn zero_length_bar_is_numerical_error() {
        let err = bar_stiffness(&bar(1.0, 1.0), &coords(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::Numerical(_)));
    }

    #[test]
    fn spring_uses_rate_constant() {
        let mut et = ElementType::new(4, "SSPRING").unwrap();
        et.set_real_constant(1, 250.0).unwrap();
        let k = spring_stiffness(&et, &coords(0.0, 3.0)).unwrap();
        assert!((k[(1, 1)] - 250.0).abs() < 1e-9);
        assert!((k[(1, 3)] + 250.0).abs() < 1e-9);
        assert!(k[(0, 0)].abs() < 1e-9);
    }
}

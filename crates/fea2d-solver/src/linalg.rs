//! Dense linear algebra kernel.
//!
//! Storage is nalgebra's `DMatrix`/`DVector` (row/column indexing with
//! `(i, j)`). Allocation, copy, transpose and scalar multiplication come
//! straight from nalgebra; the functions here add the shape checks the rest of
//! the crate depends on, the closed-form 2×2 helpers used by the isoparametric
//! mapping, and the direct solvers.
//!
//! ## Gaussian elimination
//!
//! [`gauss_solve`] performs forward elimination followed by back substitution
//! **without pivoting**. A pivot that is exactly zero aborts the solve with
//! [`Error::Numerical`]; there is no row exchange fallback.

use crate::error::{Error, Result};
use nalgebra::{DMatrix, DVector};

/// Dense row/column matrix of `f64`.
pub type Matrix = DMatrix<f64>;
/// Dense column vector of `f64`.
pub type Vector = DVector<f64>;

/// Relative tolerance used by [`approx_eq`] and [`vector_approx_eq`].
pub const EPSILON: f64 = 1e-6;

fn shape(a: &Matrix) -> (usize, usize) {
    (a.nrows(), a.ncols())
}

fn vector_shape(v: &Vector) -> (usize, usize) {
    (v.len(), 1)
}

/// Square identity matrix of order `n`
pub fn identity(n: usize) -> Matrix {
    Matrix::identity(n, n)
}

/// Element-wise sum `A + B`
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if shape(a) != shape(b) {
        return Err(Error::DimensionMismatch {
            operation: "matrix addition",
            left: shape(a),
            right: shape(b),
        });
    }
    Ok(a + b)
}

/// Element-wise sum `u + v`
pub fn vector_add(u: &Vector, v: &Vector) -> Result<Vector> {
    if u.len() != v.len() {
        return Err(Error::DimensionMismatch {
            operation: "vector addition",
            left: vector_shape(u),
            right: vector_shape(v),
        });
    }
    Ok(u + v)
}

/// Matrix product `A · B`
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.ncols() != b.nrows() {
        return Err(Error::DimensionMismatch {
            operation: "matrix multiplication",
            left: shape(a),
            right: shape(b),
        });
    }
    Ok(a * b)
}

/// Matrix-vector product `A · x`
pub fn multiply_vector(a: &Matrix, x: &Vector) -> Result<Vector> {
    if a.ncols() != x.len() {
        return Err(Error::DimensionMismatch {
            operation: "matrix-vector multiplication",
            left: shape(a),
            right: vector_shape(x),
        });
    }
    Ok(a * x)
}

fn require_2x2(a: &Matrix, operation: &'static str) -> Result<()> {
    if shape(a) != (2, 2) {
        return Err(Error::DimensionMismatch {
            operation,
            left: shape(a),
            right: (2, 2),
        });
    }
    Ok(())
}

/// Closed-form determinant of a 2×2 matrix
pub fn determinant_2x2(a: &Matrix) -> Result<f64> {
    require_2x2(a, "2x2 determinant")?;
    Ok(a[(0, 0)] * a[(1, 1)] - a[(1, 0)] * a[(0, 1)])
}

/// Closed-form inverse of a 2×2 matrix (adjugate over determinant)
pub fn inverse_2x2(a: &Matrix) -> Result<Matrix> {
    let det = determinant_2x2(a)?;
    if det == 0.0 {
        return Err(Error::numerical("cannot invert a singular 2x2 matrix"));
    }
    let mut inv = Matrix::from_row_slice(2, 2, &[a[(1, 1)], -a[(0, 1)], -a[(1, 0)], a[(0, 0)]]);
    inv *= 1.0 / det;
    Ok(inv)
}

fn close_floats(x: f64, y: f64) -> bool {
    if x == y {
        return true;
    }
    ((x / y) - 1.0).abs() < EPSILON
}

/// Entry-wise relative comparison, `|a/b - 1| < 1e-6`.
///
/// Shapes must agree. Intended for tests and diagnostics.
pub fn approx_eq(a: &Matrix, b: &Matrix) -> bool {
    shape(a) == shape(b) && a.iter().zip(b.iter()).all(|(&x, &y)| close_floats(x, y))
}

/// Vector counterpart of [`approx_eq`]
pub fn vector_approx_eq(u: &Vector, v: &Vector) -> bool {
    u.len() == v.len() && u.iter().zip(v.iter()).all(|(&x, &y)| close_floats(x, y))
}

fn check_system(a: &Matrix, b: &Vector, operation: &'static str) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            operation,
            left: shape(a),
            right: (a.nrows(), a.nrows()),
        });
    }
    if a.ncols() != b.len() {
        return Err(Error::DimensionMismatch {
            operation,
            left: shape(a),
            right: vector_shape(b),
        });
    }
    Ok(())
}

/// Reduce `A` to upper-triangular form, applying the same row operations to `b`.
pub fn forward_elimination(a: &mut Matrix, b: &mut Vector) -> Result<()> {
    check_system(a, b, "forward elimination")?;
    let n = b.len();
    for i in 0..n {
        let pivot = a[(i, i)];
        if pivot == 0.0 {
            return Err(Error::numerical(format!(
                "zero pivot at row {i} during forward elimination"
            )));
        }
        for j in (i + 1)..n {
            let factor = a[(j, i)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in i..n {
                a[(j, k)] -= factor * a[(i, k)];
            }
            b[j] -= factor * b[i];
        }
    }
    Ok(())
}

/// Solve the upper-triangular system in place; `b` becomes the solution.
pub fn back_substitution(a: &Matrix, b: &mut Vector) -> Result<()> {
    check_system(a, b, "back substitution")?;
    let n = b.len();
    for i in (0..n).rev() {
        for j in (i + 1)..n {
            b[i] -= a[(i, j)] * b[j];
        }
        if a[(i, i)] == 0.0 {
            return Err(Error::numerical(format!(
                "zero diagonal at row {i} during back substitution"
            )));
        }
        b[i] /= a[(i, i)];
    }
    Ok(())
}

/// Solve `A x = b` in place by Gaussian elimination without pivoting.
///
/// On success `a` holds the eliminated upper-triangular factor and `b` holds
/// `x`. On failure both are left partially reduced and must be discarded.
pub fn gauss_solve(a: &mut Matrix, b: &mut Vector) -> Result<()> {
    forward_elimination(a, b)?;
    back_substitution(a, b)
}

/// Overwrite `a` with its lower Cholesky factor `L` (`A = L Lᵀ`).
///
/// Cholesky–Banachiewicz, row by row. The strict upper triangle is zeroed.
pub fn cholesky_in_place(a: &mut Matrix) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            operation: "cholesky factorization",
            left: shape(a),
            right: (a.nrows(), a.nrows()),
        });
    }
    let n = a.nrows();
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| a[(i, k)] * a[(j, k)]).sum();
            if i == j {
                let d = a[(i, i)] - sum;
                if d <= 0.0 {
                    return Err(Error::numerical(format!(
                        "matrix is not positive definite (row {i})"
                    )));
                }
                a[(i, j)] = d.sqrt();
            } else {
                a[(i, j)] = (a[(i, j)] - sum) / a[(j, j)];
            }
        }
        for j in (i + 1)..n {
            a[(i, j)] = 0.0;
        }
    }
    Ok(())
}

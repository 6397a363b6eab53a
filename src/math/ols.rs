//! Least squares solvers.
//!
//! The trend fit solves small problems of the form
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2 + Σ λ_j β_j^2
//! ```
//!
//! where only the changepoint coefficients carry a penalty. The penalty is
//! applied by appending `sqrt(λ_j)` rows to the design matrix, which turns the
//! ridge problem into an ordinary least squares problem.
//!
//! We solve with SVD so tall (more rows than columns) and nearly collinear
//! designs are handled without panicking.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve a ridge problem with a per-column penalty (`0.0` = unpenalized).
///
/// `penalties.len()` must equal the number of columns of `x`.
pub fn solve_ridge(x: &DMatrix<f64>, y: &DVector<f64>, penalties: &[f64]) -> Option<DVector<f64>> {
    debug_assert_eq!(penalties.len(), x.ncols());

    let penalized: Vec<usize> = penalties
        .iter()
        .enumerate()
        .filter(|(_, l)| **l > 0.0)
        .map(|(j, _)| j)
        .collect();
    if penalized.is_empty() {
        return solve_least_squares(x, y);
    }

    let n = x.nrows();
    let p = x.ncols();
    let mut xa = DMatrix::<f64>::zeros(n + penalized.len(), p);
    let mut ya = DVector::<f64>::zeros(n + penalized.len());
    xa.rows_mut(0, n).copy_from(x);
    ya.rows_mut(0, n).copy_from(y);
    for (k, &j) in penalized.iter().enumerate() {
        xa[(n + k, j)] = penalties[j].sqrt();
    }

    solve_least_squares(&xa, &ya)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn ridge_without_penalties_matches_ols() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0, 3.0, 4.0]);
        let a = solve_least_squares(&x, &y).unwrap();
        let b = solve_ridge(&x, &y, &[0.0, 0.0]).unwrap();
        assert!((a - b).norm() < 1e-12);
    }

    #[test]
    fn ridge_shrinks_penalized_column() {
        // y = 4 * x1 exactly; a heavy penalty on x1 pulls its coefficient towards 0.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = DVector::from_row_slice(&[0.0, 4.0, 8.0, 12.0]);
        let free = solve_ridge(&x, &y, &[0.0, 0.0]).unwrap();
        let shrunk = solve_ridge(&x, &y, &[0.0, 100.0]).unwrap();
        assert!((free[1] - 4.0).abs() < 1e-9);
        assert!(shrunk[1].abs() < free[1].abs());
    }
}

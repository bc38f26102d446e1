//! Gauss-Jordan elimination with partial pivoting.
//!
//! Reduces an augmented `n × (n + 1)` system all the way to reduced
//! row-echelon form, so the solution can be read off the last column with
//! no back-substitution pass. At every pivot column the row with the
//! largest absolute entry is swapped into place first; a best pivot below
//! [`PIVOT_TOL`] marks the system singular and is reported as such rather
//! than divided through.

use crate::error::{Result, TamperError};
use nalgebra::{DMatrix, DVector};

/// Magnitude below which a pivot is considered unusable.
pub const PIVOT_TOL: f64 = 1e-10;

/// Solve `A x = b` given as the augmented matrix `[A | b]`.
///
/// Returns the solution vector, `SingularSystem` with the offending pivot
/// column when the system is singular or near-singular, or
/// `InvalidDimensions` when the input is not `n × (n + 1)`.
pub fn solve_linear_system(augmented: &DMatrix<f64>) -> Result<DVector<f64>> {
    let n = augmented.nrows();
    if n == 0 || augmented.ncols() != n + 1 {
        return Err(TamperError::InvalidDimensions(format!(
            "augmented system must be n x (n + 1), found {} x {}",
            n,
            augmented.ncols()
        )));
    }

    let mut work = augmented.clone();
    for col in 0..n {
        // Partial pivot: largest |entry| among the remaining rows.
        let mut pivot_row = col;
        let mut pivot_mag = work[(col, col)].abs();
        for row in col + 1..n {
            let mag = work[(row, col)].abs();
            if mag > pivot_mag {
                pivot_mag = mag;
                pivot_row = row;
            }
        }
        if pivot_mag < PIVOT_TOL {
            return Err(TamperError::SingularSystem { pivot: col });
        }
        work.swap_rows(col, pivot_row);

        let pivot = work[(col, col)];
        let inv = 1.0 / pivot;
        for j in col..=n {
            work[(col, j)] *= inv;
        }

        // Eliminate the column everywhere else, not just below, so the
        // first n columns finish as the identity.
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = work[(row, col)];
            if factor == 0.0 {
                continue;
            }
            for j in col..=n {
                let v = work[(col, j)];
                work[(row, j)] -= factor * v;
            }
        }
    }

    Ok(DVector::from_iterator(n, (0..n).map(|i| work[(i, n)])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn augmented(rows: &[&[f64]]) -> DMatrix<f64> {
        let nrows = rows.len();
        let ncols = rows[0].len();
        DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j])
    }

    #[test]
    fn solves_well_conditioned_system() {
        let aug = augmented(&[
            &[2.0, 1.0, -1.0, 8.0],
            &[3.0, -1.0, 2.0, 11.0],
            &[-2.0, 1.0, 2.0, -3.0],
        ]);
        let x = solve_linear_system(&aug).expect("unique solution");
        let expected = [2.0, 3.0, -1.0];
        for (i, &e) in expected.iter().enumerate() {
            assert!(
                (x[i] - e).abs() < 1e-6,
                "x[{i}] = {} expected {e}",
                x[i]
            );
        }
    }

    #[test]
    fn reports_singular_system() {
        // Second row is a multiple of the first.
        let aug = augmented(&[
            &[1.0, 2.0, 3.0],
            &[2.0, 4.0, 6.0],
        ]);
        let err = solve_linear_system(&aug).unwrap_err();
        assert!(matches!(err, TamperError::SingularSystem { .. }));
    }

    #[test]
    fn reports_pivot_column_of_failure() {
        let aug = augmented(&[
            &[1.0, 1.0, 0.0, 1.0],
            &[0.0, 0.0, 0.0, 2.0],
            &[0.0, 0.0, 1.0, 3.0],
        ]);
        match solve_linear_system(&aug).unwrap_err() {
            TamperError::SingularSystem { pivot } => assert_eq!(pivot, 1),
            other => panic!("expected SingularSystem, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_augmented_shape() {
        let square = augmented(&[&[1.0, 0.0], &[0.0, 1.0]]);
        assert!(matches!(
            solve_linear_system(&square).unwrap_err(),
            TamperError::InvalidDimensions(_)
        ));
        let empty = DMatrix::<f64>::zeros(0, 1);
        assert!(matches!(
            solve_linear_system(&empty).unwrap_err(),
            TamperError::InvalidDimensions(_)
        ));
    }

    #[test]
    fn pivoting_handles_zero_leading_entry() {
        let aug = augmented(&[
            &[0.0, 1.0, 2.0],
            &[1.0, 0.0, 3.0],
        ]);
        let x = solve_linear_system(&aug).expect("solvable after row swap");
        assert!((x[0] - 3.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }
}

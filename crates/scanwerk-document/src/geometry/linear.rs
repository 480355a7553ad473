// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dense linear system solving via Gaussian elimination with partial pivoting.

/// Solve the dense N×N linear system `a · x = b`.
///
/// Uses Gaussian elimination with partial pivoting: for each column the row
/// with the largest remaining magnitude becomes the pivot. Corner coordinates
/// can differ by orders of magnitude between image resolutions, so pivoting on
/// magnitude keeps the elimination stable across that range.
///
/// Takes ownership of both inputs and consumes them destructively. A pivot of
/// exactly zero after row selection means the system is singular; no error is
/// raised and the returned vector carries NaN or infinite entries, leaving
/// degeneracy detection to the caller.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let n = b.len();
    assert_eq!(a.len(), n, "coefficient matrix must have one row per unknown");
    for row in &a {
        assert_eq!(row.len(), n, "coefficient matrix must be square");
    }

    // Forward elimination.
    for col in 0..n {
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if pivot_row != col {
            a.swap(col, pivot_row);
            b.swap(col, pivot_row);
        }

        let (upper, lower) = a.split_at_mut(col + 1);
        let pivot_vals = &upper[col];
        let pivot = pivot_vals[col];
        let b_pivot = b[col];

        for (offset, row) in lower.iter_mut().enumerate() {
            let factor = row[col] / pivot;
            for k in col..n {
                row[k] -= factor * pivot_vals[k];
            }
            b[col + 1 + offset] -= factor * b_pivot;
        }
    }

    // Back substitution.
    let mut x = vec![0.0f64; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_two_by_two() {
        // 2x + y = 3, x + 3y = 5 → x = 4/5, y = 7/5
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let b = vec![3.0, 5.0];
        let x = solve(a, b);
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn pivots_past_leading_zero() {
        // Without row exchange the first pivot would be zero.
        let a = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let b = vec![2.0, 3.0];
        let x = solve(a, b);
        assert!((x[0] - 3.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn recovers_known_solution_four_by_four() {
        let a = vec![
            vec![4.0, -2.0, 1.0, 3.0],
            vec![1.0, 5.0, -1.0, 2.0],
            vec![2.0, 1.0, 6.0, -3.0],
            vec![-1.0, 3.0, 2.0, 7.0],
        ];
        let expected = [1.5, -2.0, 0.25, 3.0];
        let b: Vec<f64> = a
            .iter()
            .map(|row| row.iter().zip(expected.iter()).map(|(c, x)| c * x).sum())
            .collect();

        let x = solve(a, b);
        for (got, want) in x.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "expected {want}, got {got}");
        }
    }

    #[test]
    fn singular_system_yields_non_finite() {
        // Second row is a multiple of the first — rank deficient.
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let b = vec![1.0, 2.0];
        let x = solve(a, b);
        assert!(x.iter().any(|v| !v.is_finite()), "got {x:?}");
    }
}

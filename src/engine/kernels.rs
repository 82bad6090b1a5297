// Computation Kernels
// Per-cell arithmetic shared by the parallel workers and the sequential reference
use ndarray::Array2;

/// Value of output cell (row, col): `sum_i A[i][col] * B[row][i]`.
///
/// This is the transpose of the textbook row-by-column product, i.e. the
/// full output equals `B . A`. Pure; safe to call concurrently.
/// The sum must fit in `i64`; [`crate::engine::grid::Grid::new`] rejects inputs where it may not.
pub fn solve_cell(row: usize, col: usize, a: &Array2<i64>, b: &Array2<i64>) -> i64 {
    a.column(col).dot(&b.row(row))
}

/// Single-threaded reference using the same index convention as [`solve_cell`].
pub fn reference_multiply(a: &Array2<i64>, b: &Array2<i64>) -> Array2<i64> {
    let n = a.nrows();
    let mut out = Array2::zeros((n, n));
    for row in 0..n {
        for col in 0..n {
            let mut sum = 0;
            for i in 0..n {
                sum += a[[i, col]] * b[[row, i]];
            }
            out[[row, col]] = sum;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn solve_cell_uses_transposed_convention() {
        let a = array![[1, 2], [3, 4]];
        let b = array![[5, 6], [7, 8]];
        assert_eq!(solve_cell(0, 0, &a, &b), 1 * 5 + 3 * 6);
        assert_eq!(solve_cell(0, 1, &a, &b), 2 * 5 + 4 * 6);
        assert_eq!(solve_cell(1, 0, &a, &b), 1 * 7 + 3 * 8);
        assert_eq!(solve_cell(1, 1, &a, &b), 2 * 7 + 4 * 8);
    }

    #[test]
    fn reference_equals_b_times_a() {
        let a = array![[2, 0, 1], [1, 3, 4], [0, 1, 1]];
        let b = array![[1, 1, 0], [4, 2, 2], [3, 0, 1]];
        assert_eq!(reference_multiply(&a, &b), b.dot(&a));
    }

    #[test]
    fn reference_agrees_with_solve_cell() {
        let a = array![[2, 0, 1], [1, 3, 4], [0, 1, 1]];
        let b = array![[1, 1, 0], [4, 2, 2], [3, 0, 1]];
        let reference = reference_multiply(&a, &b);
        for ((row, col), v) in reference.indexed_iter() {
            assert_eq!(*v, solve_cell(row, col, &a, &b));
        }
    }
}

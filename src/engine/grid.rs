// Grid Storage
use std::fmt;
use std::sync::OnceLock;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::error::{EngineError, Result};

/// Write-once output slots, one per cell, row-major.
///
/// Workers only ever receive distinct coordinates, so writes take no lock.
/// A second write to the same slot is rejected rather than overwriting.
pub struct OutputCells {
    size: usize,
    cells: Box<[OnceLock<i64>]>,
}

impl OutputCells {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: (0..size * size).map(|_| OnceLock::new()).collect(),
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    /// Stores `value` at (row, col). Returns `false` if the cell already held a value.
    pub fn write(&self, row: usize, col: usize, value: i64) -> bool {
        self.cells[self.index(row, col)].set(value).is_ok()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        self.cells[self.index(row, col)].get().copied()
    }

    pub fn written(&self) -> usize {
        self.cells.iter().filter(|c| c.get().is_some()).count()
    }

    /// Snapshot of the finished output. Fails if any cell is still empty.
    pub fn to_array(&self) -> Result<Array2<i64>> {
        let missing = self.cells.len() - self.written();
        if missing > 0 {
            return Err(EngineError::Incomplete { missing });
        }
        Ok(Array2::from_shape_fn((self.size, self.size), |(r, c)| {
            self.get(r, c).unwrap_or_default()
        }))
    }
}

/// The shared data of one multiplication: two read-only inputs and the output.
/// Shared by reference across every worker for the duration of a run.
pub struct Grid {
    size: usize,
    a: Array2<i64>,
    b: Array2<i64>,
    output: OutputCells,
}

impl Grid {
    pub fn new(a: Array2<i64>, b: Array2<i64>) -> Result<Self> {
        let size = square_dim(&a)?;
        let b_size = square_dim(&b)?;
        if size != b_size {
            return Err(EngineError::ShapeMismatch { a: size, b: b_size });
        }
        check_products(size, max_abs(&a), max_abs(&b))?;
        Ok(Self {
            size,
            a,
            b,
            output: OutputCells::new(size),
        })
    }

    /// Builds both inputs from one RNG stream seeded with `seed`; A is filled first.
    pub fn seeded(size: usize, seed: u64, high: i64) -> Result<Self> {
        if high <= 0 {
            return Err(EngineError::InvalidBound(high));
        }
        let max = high.unsigned_abs() - 1;
        check_products(size, max, max)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let a = random_matrix(size, high, &mut rng);
        let b = random_matrix(size, high, &mut rng);
        log::debug!("seeded {size}x{size} inputs (seed {seed}, values < {high})");
        Self::new(a, b)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn a(&self) -> &Array2<i64> {
        &self.a
    }

    pub fn b(&self) -> &Array2<i64> {
        &self.b
    }

    pub fn output(&self) -> &OutputCells {
        &self.output
    }

    pub fn solution(&self) -> Result<Array2<i64>> {
        self.output.to_array()
    }

    /// Drops any previous result so the same inputs can be multiplied again.
    pub fn reset_output(&mut self) {
        self.output = OutputCells::new(self.size);
    }
}

fn square_dim(m: &Array2<i64>) -> Result<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(EngineError::NotSquare { rows, cols });
    }
    Ok(rows)
}

fn max_abs(m: &Array2<i64>) -> u64 {
    m.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0)
}

/// Every output cell is a sum of `size` products, each bounded by `max_a * max_b`.
/// Rejects inputs where that bound does not fit in `i64`, so cell sums never overflow.
fn check_products(size: usize, max_a: u64, max_b: u64) -> Result<()> {
    let bound = u128::from(max_a)
        .checked_mul(u128::from(max_b))
        .and_then(|p| p.checked_mul(size as u128));
    match bound {
        Some(b) if b <= i64::MAX as u128 => Ok(()),
        _ => Err(EngineError::Overflow { size, max_a, max_b }),
    }
}

// Second index outer, first index inner.
fn random_matrix(size: usize, high: i64, rng: &mut StdRng) -> Array2<i64> {
    let mut m = Array2::zeros((size, size));
    for y in 0..size {
        for x in 0..size {
            m[[x, y]] = rng.gen_range(0..high);
        }
    }
    m
}

/// Text dump of a matrix: one printed line per second index, width 5 per value,
/// followed by a blank line.
pub struct Pretty<'a> {
    pub name: &'a str,
    pub matrix: &'a Array2<i64>,
}

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}:", self.name)?;
        let (xs, ys) = self.matrix.dim();
        for y in 0..ys {
            for x in 0..xs {
                write!(f, "{:5}", self.matrix[[x, y]])?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}

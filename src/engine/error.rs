// Engine Errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("input shapes differ: A is {a}x{a}, B is {b}x{b}")]
    ShapeMismatch { a: usize, b: usize },

    #[error("value bound must be positive, got {0}")]
    InvalidBound(i64),

    #[error("values up to {max_a} and {max_b} summed over {size} terms overflow i64")]
    Overflow { size: usize, max_a: u64, max_b: u64 },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("grid not initialized")]
    NotInitialized,

    #[error("output incomplete: {missing} cell(s) never written")]
    Incomplete { missing: usize },

    #[error("cell ({row}, {col}) mismatch: expected {expected}, got {actual}")]
    Mismatch {
        row: usize,
        col: usize,
        expected: i64,
        actual: i64,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

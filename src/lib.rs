//! Pull-based parallel matrix multiplication.
//!
//! Workers repeatedly claim the next output cell from a single
//! [`WorkDispatcher`], compute it, and stop on their own once the grid is
//! exhausted. No work is partitioned up front.

pub mod engine;
#[cfg(feature = "python")]
mod python;

pub use engine::config::MatmulConfig;
pub use engine::controller::{parallel_multiply, MatmulController, RunReport};
pub use engine::dispatcher::{ClaimLedger, WorkCursor, WorkDispatcher};
pub use engine::error::{EngineError, Result};
pub use engine::grid::{Grid, OutputCells, Pretty};
pub use engine::kernels::{reference_multiply, solve_cell};
pub use engine::task::Task;
pub use engine::worker::{run_workers, worker_loop, WorkerReport};

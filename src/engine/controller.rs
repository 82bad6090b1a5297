// Controller
use std::time::{Duration, Instant};

use ndarray::Array2;

use crate::engine::config::MatmulConfig;
use crate::engine::dispatcher::WorkDispatcher;
use crate::engine::error::{EngineError, Result};
use crate::engine::grid::Grid;
use crate::engine::kernels::reference_multiply;
use crate::engine::worker::{run_workers, WorkerReport};

/// Outcome of one parallel run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub solution: Array2<i64>,
    pub workers: Vec<WorkerReport>,
    /// Wall-clock time of the worker region only.
    pub elapsed: Duration,
}

impl RunReport {
    pub fn total_claims(&self) -> usize {
        self.workers.iter().map(|w| w.claims).sum()
    }

    /// The timing line printed after the solution.
    pub fn elapsed_line(&self) -> String {
        format!("Time elapsed (sec): {:.6}", self.elapsed.as_secs_f64())
    }
}

pub struct MatmulController {
    config: MatmulConfig,
    grid: Option<Grid>, // Option until initialized
}

impl MatmulController {
    pub fn new(config: MatmulConfig) -> Self {
        Self { config, grid: None }
    }

    /// Controller over caller-supplied inputs; no seeding needed.
    pub fn with_inputs(a: Array2<i64>, b: Array2<i64>, threads: Option<usize>) -> Result<Self> {
        let grid = Grid::new(a, b)?;
        let config = MatmulConfig {
            size: grid.size(),
            threads,
            ..MatmulConfig::default()
        };
        Ok(Self {
            config,
            grid: Some(grid),
        })
    }

    pub fn config(&self) -> &MatmulConfig {
        &self.config
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Phase 1: fill both inputs from the configured seed.
    pub fn initialize(&mut self) -> Result<&Grid> {
        let grid = self.seeded_grid()?;
        Ok(self.grid.insert(grid))
    }

    fn seeded_grid(&self) -> Result<Grid> {
        let grid = Grid::seeded(self.config.size, self.config.seed, self.config.high)?;
        log::info!(
            "initialized {0}x{0} grid (seed {1})",
            self.config.size,
            self.config.seed
        );
        Ok(grid)
    }

    /// Phase 2: let the workers drain the grid. Initializes first if needed.
    pub fn run(&mut self) -> Result<RunReport> {
        let threads = self.config.threads;
        let grid = match self.grid.take() {
            Some(grid) => grid,
            None => self.seeded_grid()?,
        };
        let grid = self.grid.insert(grid);
        grid.reset_output();

        let dispatcher = WorkDispatcher::new(grid.size());
        let start = Instant::now();
        let workers = run_workers(&dispatcher, grid, threads)?;
        let elapsed = start.elapsed();

        let solution = grid.solution()?;
        log::info!(
            "{} worker(s) computed {} cell(s) with {} claim(s) in {:?}",
            workers.len(),
            grid.size() * grid.size(),
            dispatcher.claims(),
            elapsed
        );
        Ok(RunReport {
            solution,
            workers,
            elapsed,
        })
    }

    /// Compares a solution against the sequential reference for the current inputs.
    pub fn verify(&self, solution: &Array2<i64>) -> Result<()> {
        let grid = self
            .grid
            .as_ref()
            .ok_or(EngineError::NotInitialized)?;
        let (rows, cols) = solution.dim();
        if rows != cols {
            return Err(EngineError::NotSquare { rows, cols });
        }
        if rows != grid.size() {
            return Err(EngineError::ShapeMismatch {
                a: grid.size(),
                b: rows,
            });
        }
        let expected = reference_multiply(grid.a(), grid.b());
        for ((row, col), &want) in expected.indexed_iter() {
            let got = solution[[row, col]];
            if got != want {
                return Err(EngineError::Mismatch {
                    row,
                    col,
                    expected: want,
                    actual: got,
                });
            }
        }
        Ok(())
    }
}

/// Multiplies `a` and `b` (output cell convention of [`crate::engine::kernels::solve_cell`])
/// with `threads` pulling workers.
pub fn parallel_multiply(
    a: &Array2<i64>,
    b: &Array2<i64>,
    threads: Option<usize>,
) -> Result<Array2<i64>> {
    let mut controller = MatmulController::with_inputs(a.clone(), b.clone(), threads)?;
    Ok(controller.run()?.solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn run_initializes_on_demand() {
        let mut controller = MatmulController::new(MatmulConfig::default().with_threads(2));
        assert!(controller.grid().is_none());
        let report = controller.run().unwrap();
        assert!(controller.grid().is_some());
        assert_eq!(report.workers.len(), 2);
        assert_eq!(report.total_claims(), 25 + 2);
        controller.verify(&report.solution).unwrap();
    }

    #[test]
    fn rerun_gives_same_solution() {
        let mut controller = MatmulController::new(MatmulConfig::default().with_threads(3));
        let first = controller.run().unwrap().solution;
        let second = controller.run().unwrap().solution;
        assert_eq!(first, second);
    }

    #[test]
    fn verify_reports_first_mismatch() {
        let controller =
            MatmulController::with_inputs(array![[1, 2], [3, 4]], array![[5, 6], [7, 8]], None)
                .unwrap();
        let wrong = array![[23, 34], [31, 0]];
        match controller.verify(&wrong) {
            Err(EngineError::Mismatch { row, col, expected, actual }) => {
                assert_eq!((row, col, expected, actual), (1, 1, 46, 0));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn verify_rejects_wrong_shape() {
        let controller =
            MatmulController::with_inputs(array![[1, 2], [3, 4]], array![[5, 6], [7, 8]], None)
                .unwrap();
        assert!(matches!(
            controller.verify(&Array2::zeros((3, 3))),
            Err(EngineError::ShapeMismatch { a: 2, b: 3 })
        ));
        assert!(matches!(
            controller.verify(&Array2::zeros((2, 1))),
            Err(EngineError::NotSquare { rows: 2, cols: 1 })
        ));
    }

    #[test]
    fn elapsed_line_has_six_decimals() {
        let report = RunReport {
            solution: Array2::zeros((0, 0)),
            workers: Vec::new(),
            elapsed: Duration::from_micros(1_234_567),
        };
        assert_eq!(report.elapsed_line(), "Time elapsed (sec): 1.234567");
    }

    #[test]
    fn verify_requires_inputs() {
        let controller = MatmulController::new(MatmulConfig::default());
        assert!(matches!(
            controller.verify(&Array2::zeros((5, 5))),
            Err(EngineError::NotInitialized)
        ));
    }

    #[test]
    fn invalid_bound_surfaces_as_error() {
        let config = MatmulConfig {
            high: 0,
            ..MatmulConfig::default()
        };
        assert!(matches!(
            MatmulController::new(config).run(),
            Err(EngineError::InvalidBound(0))
        ));
    }
}

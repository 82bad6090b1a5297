// Worker Loop
use rayon::ThreadPoolBuilder;

use crate::engine::dispatcher::WorkDispatcher;
use crate::engine::error::{EngineError, Result};
use crate::engine::grid::Grid;

/// What one worker did before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    /// Cells this worker computed.
    pub cells: usize,
    /// Claims it made, the final `Terminate` included (always `cells + 1`).
    pub claims: usize,
}

/// Pull, execute, repeat until a claim comes back as `Terminate`.
/// Fails without claiming anything if `dispatcher` does not cover `grid`.
pub fn worker_loop(
    worker: usize,
    dispatcher: &WorkDispatcher,
    grid: &Grid,
) -> Result<WorkerReport> {
    check_sizes(dispatcher, grid)?;
    Ok(pull_until_terminate(worker, dispatcher, grid))
}

fn check_sizes(dispatcher: &WorkDispatcher, grid: &Grid) -> Result<()> {
    if dispatcher.size() != grid.size() {
        return Err(EngineError::ShapeMismatch {
            a: grid.size(),
            b: dispatcher.size(),
        });
    }
    Ok(())
}

fn pull_until_terminate(worker: usize, dispatcher: &WorkDispatcher, grid: &Grid) -> WorkerReport {
    let mut cells = 0;
    while dispatcher.claim_next().execute(grid) {
        cells += 1;
    }
    log::trace!("worker {worker} stopped after {cells} cell(s)");
    WorkerReport {
        worker,
        cells,
        claims: cells + 1,
    }
}

/// Fork-join region: one [`worker_loop`] on every thread of a fresh pool,
/// returning once all of them have stopped.
pub fn run_workers(
    dispatcher: &WorkDispatcher,
    grid: &Grid,
    threads: Option<usize>,
) -> Result<Vec<WorkerReport>> {
    check_sizes(dispatcher, grid)?;
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("pullgrid-worker-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;
    log::debug!("starting {} worker(s)", pool.current_num_threads());

    Ok(pool.broadcast(|ctx| pull_until_terminate(ctx.index(), dispatcher, grid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn lone_worker_computes_every_cell() {
        let grid = Grid::new(array![[1, 2], [3, 4]], array![[5, 6], [7, 8]]).unwrap();
        let dispatcher = WorkDispatcher::new(2);
        let report = worker_loop(0, &dispatcher, &grid).unwrap();
        assert_eq!(report.cells, 4);
        assert_eq!(report.claims, 5);
        assert_eq!(grid.solution().unwrap(), array![[23, 34], [31, 46]]);
    }

    #[test]
    fn pool_runs_one_loop_per_thread() {
        let grid = Grid::seeded(4, 7, 10).unwrap();
        let dispatcher = WorkDispatcher::new(4);
        let reports = run_workers(&dispatcher, &grid, Some(3)).unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports.iter().map(|r| r.cells).sum::<usize>(), 16);
        assert_eq!(dispatcher.claims(), 16 + 3);
    }

    #[test]
    fn dispatcher_must_cover_the_grid() {
        let grid = Grid::new(Array2::zeros((2, 2)), Array2::zeros((2, 2))).unwrap();
        let dispatcher = WorkDispatcher::new(3);
        assert!(matches!(
            run_workers(&dispatcher, &grid, Some(2)),
            Err(EngineError::ShapeMismatch { a: 2, b: 3 })
        ));
        assert!(matches!(
            worker_loop(0, &dispatcher, &grid),
            Err(EngineError::ShapeMismatch { a: 2, b: 3 })
        ));
        // Nothing was claimed.
        assert_eq!(dispatcher.claims(), 0);
    }
}

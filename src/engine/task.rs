// Work Units
use crate::engine::grid::Grid;
use crate::engine::kernels::solve_cell;

/// One claimed unit of work. Coordinates are owned by the value, so a task
/// never observes the cursor after it was claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Compute { row: usize, col: usize },
    Terminate,
}

impl Task {
    /// Runs the task against `grid` and reports whether the worker should keep pulling.
    pub fn execute(self, grid: &Grid) -> bool {
        match self {
            Task::Compute { row, col } => {
                let value = solve_cell(row, col, grid.a(), grid.b());
                let fresh = grid.output().write(row, col, value);
                if !fresh {
                    log::error!("cell ({row}, {col}) handed out twice");
                }
                debug_assert!(fresh, "cell ({row}, {col}) handed out twice");
                true
            }
            Task::Terminate => false,
        }
    }
}

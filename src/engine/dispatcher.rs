// Work Dispatcher
// Single claim point over the output grid. Every worker pulls from here.
use bitvec::prelude::*;
use parking_lot::Mutex;

use crate::engine::task::Task;

/// Position of the next unclaimed cell. The column advances fastest:
/// all columns of row 0, then all columns of row 1, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkCursor {
    row: usize,
    col: usize,
}

impl WorkCursor {
    /// At (0, 0), the first unclaimed cell.
    pub fn start() -> Self {
        Self { row: 0, col: 0 }
    }

    /// Takes the cell under the cursor and steps past it, wrapping to the
    /// next row when the column runs off the grid. Returns `None` once the
    /// row is past the grid; an exhausted cursor no longer moves.
    fn advance(&mut self, size: usize) -> Option<(usize, usize)> {
        if self.row >= size {
            return None;
        }
        let claimed = (self.row, self.col);
        self.col += 1;
        if self.col >= size {
            self.col = 0;
            self.row += 1;
        }
        Some(claimed)
    }
}

/// One bit per output cell, set when a `Compute` claim for that cell is handed out.
#[derive(Debug, Clone)]
pub struct ClaimLedger {
    size: usize,
    claimed: BitVec,
    duplicates: usize,
}

impl ClaimLedger {
    fn new(size: usize) -> Self {
        Self {
            size,
            claimed: bitvec![0; size * size],
            duplicates: 0,
        }
    }

    fn record(&mut self, row: usize, col: usize) {
        if self.claimed.replace(row * self.size + col, true) {
            self.duplicates += 1;
        }
    }

    pub fn claimed_cells(&self) -> usize {
        self.claimed.count_ones()
    }

    pub fn is_claimed(&self, row: usize, col: usize) -> bool {
        self.claimed[row * self.size + col]
    }

    /// Claims that hit an already-claimed cell. Zero unless the cursor is broken.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn unclaimed(&self) -> Vec<(usize, usize)> {
        self.claimed
            .iter_zeros()
            .map(|idx| (idx / self.size, idx % self.size))
            .collect()
    }
}

struct ClaimState {
    cursor: WorkCursor,
    claims: usize,
    ledger: Option<ClaimLedger>,
}

/// Hands out each cell of a `size x size` grid exactly once, then `Terminate` forever.
///
/// One instance per run, borrowed by every worker. The cursor is only
/// touched under the lock, and the coordinates are copied out before the
/// lock is released.
pub struct WorkDispatcher {
    size: usize,
    state: Mutex<ClaimState>,
}

impl WorkDispatcher {
    pub fn new(size: usize) -> Self {
        Self::build(size, None)
    }

    /// Same as [`WorkDispatcher::new`], additionally recording every claim in a [`ClaimLedger`].
    pub fn with_ledger(size: usize) -> Self {
        Self::build(size, Some(ClaimLedger::new(size)))
    }

    fn build(size: usize, ledger: Option<ClaimLedger>) -> Self {
        Self {
            size,
            state: Mutex::new(ClaimState {
                cursor: WorkCursor::start(),
                claims: 0,
                ledger,
            }),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Claims the next unit of work, or `Terminate` once the grid is exhausted.
    pub fn claim_next(&self) -> Task {
        let claimed = {
            let mut state = self.state.lock();
            state.claims += 1;
            let claimed = state.cursor.advance(self.size);
            if let (Some((row, col)), Some(ledger)) = (claimed, state.ledger.as_mut()) {
                ledger.record(row, col);
            }
            claimed
        };

        match claimed {
            Some((row, col)) => Task::Compute { row, col },
            None => Task::Terminate,
        }
    }

    /// Total claims served so far, `Terminate` included.
    pub fn claims(&self) -> usize {
        self.state.lock().claims
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.lock().cursor.row >= self.size
    }

    /// Snapshot of the ledger, if this dispatcher keeps one.
    pub fn ledger(&self) -> Option<ClaimLedger> {
        self.state.lock().ledger.clone()
    }
}

// Run Configuration

/// Edge length of the square grid.
pub const SIZE: usize = 5;
/// Seed for input generation, fixed so runs are reproducible.
pub const SEED: u64 = 34;
/// Exclusive upper bound of generated cell values.
pub const HIGH: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmulConfig {
    pub size: usize,
    pub seed: u64,
    pub high: i64,
    /// Worker count. `None` lets rayon pick (honours `RAYON_NUM_THREADS`).
    pub threads: Option<usize>,
}

impl Default for MatmulConfig {
    fn default() -> Self {
        Self {
            size: SIZE,
            seed: SEED,
            high: HIGH,
            threads: None,
        }
    }
}

impl MatmulConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn cells(&self) -> usize {
        self.size * self.size
    }
}

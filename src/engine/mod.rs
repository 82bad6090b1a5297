// Module Definition
pub mod config;
pub mod controller; // Owns a run: grid, dispatcher, worker pool, timing
pub mod dispatcher; // Shared cursor and the claim primitive
pub mod error;
pub mod grid; // Input matrices and write-once output cells
pub mod kernels; // Per-cell solver and the sequential reference
pub mod task;
pub mod worker;

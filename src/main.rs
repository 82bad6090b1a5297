use std::process::ExitCode;

use clap::Parser;

use pullgrid::engine::config::{HIGH, SEED, SIZE};
use pullgrid::{EngineError, MatmulConfig, MatmulController, Pretty};

/// Multiply two seeded random matrices with self-terminating pulling workers.
#[derive(Debug, Parser)]
#[command(name = "pullgrid", version)]
struct Args {
    /// Edge length of the square matrices
    #[arg(long, default_value_t = SIZE)]
    size: usize,

    /// Seed for input generation
    #[arg(long, default_value_t = SEED)]
    seed: u64,

    /// Exclusive upper bound of generated values
    #[arg(long, default_value_t = HIGH)]
    high: i64,

    /// Worker threads (defaults to the available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Check the result against the sequential reference
    #[arg(long)]
    verify: bool,
}

impl Args {
    fn config(&self) -> MatmulConfig {
        MatmulConfig {
            size: self.size,
            seed: self.seed,
            high: self.high,
            threads: self.threads,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), EngineError> {
    let mut controller = MatmulController::new(args.config());
    let grid = controller.initialize()?;
    print!("{}", Pretty { name: "A", matrix: grid.a() });
    print!("{}", Pretty { name: "B", matrix: grid.b() });

    let report = controller.run()?;
    print!(
        "{}",
        Pretty {
            name: "Solution",
            matrix: &report.solution
        }
    );
    if args.verify {
        controller.verify(&report.solution)?;
        log::info!("solution matches the sequential reference");
    }
    println!("{}", report.elapsed_line());
    Ok(())
}

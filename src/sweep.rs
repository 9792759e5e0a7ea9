//! Small property-test sweep harness over (seed, K, M) combinations.
//!
//! This is test tooling, not part of the solver itself: it drives
//! `Coordinator::with_seed` across a handful of configurations and can dump
//! the outcomes to CSV the way the teacher's benchmarking module dumps
//! algorithm comparison runs.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::coordinator::{Coordinator, CoordinatorParams};

/// Outcome of one sweep point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    pub seed: u64,
    pub sub_colonies: usize,
    pub ants: usize,
    pub solved: bool,
    pub cells_filled: usize,
    pub num_cells: usize,
    pub elapsed_secs: f64,
}

/// Runs one `(seed, K, M)` point against `initial` with the given timeout.
pub fn run_point(
    initial: &Board,
    seed: u64,
    sub_colonies: usize,
    ants: usize,
    timeout: Duration,
) -> SweepResult {
    let params = CoordinatorParams {
        sub_colonies,
        ants,
        timeout,
        q0: 0.9,
        rho: 0.9,
        rho_comm: 0.05,
        best_evap: 0.005,
    };
    let coordinator = Coordinator::with_seed(params, initial, seed);
    let report = coordinator.run(initial);
    SweepResult {
        seed,
        sub_colonies,
        ants,
        solved: report.solved,
        cells_filled: report.best_board.cells_filled(),
        num_cells: report.best_board.num_cells(),
        elapsed_secs: report.elapsed.as_secs_f64(),
    }
}

/// Runs the cartesian product of `seeds`, `sub_colony_counts` and
/// `ant_counts` against `initial`, each capped at `timeout`.
pub fn run_sweep(
    initial: &Board,
    seeds: &[u64],
    sub_colony_counts: &[usize],
    ant_counts: &[usize],
    timeout: Duration,
) -> Vec<SweepResult> {
    let mut results = Vec::with_capacity(seeds.len() * sub_colony_counts.len() * ant_counts.len());
    for &seed in seeds {
        for &k in sub_colony_counts {
            for &m in ant_counts {
                results.push(run_point(initial, seed, k, m, timeout));
            }
        }
    }
    results
}

/// Writes sweep results to CSV, one row per point, same shape as the
/// teacher's `BenchmarkSuite::export_to_csv`.
pub fn export_csv<P: AsRef<Path>>(results: &[SweepResult], path: P) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}

//! Command-line argument surface and the thin layer that turns parsed flags
//! into a `CoordinatorParams` + loaded `Board`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::board::Board;
use crate::coordinator::CoordinatorParams;
use crate::puzzle::{PuzzleError, PuzzleFile};

/// Engine selector shared with sibling solvers (the deterministic
/// backtracking solver and the single-colony non-parallel ACS variant);
/// this binary implements only engine `2`.
const PARALLEL_ACS_ENGINE: u32 = 2;

#[derive(Parser, Debug)]
#[command(name = "sudoku-acs-solver")]
#[command(author = "Etudiant M2 AI2D")]
#[command(version = "1.0")]
#[command(about = "A parallel Ant Colony System solver for generalized N x N Sudoku puzzles")]
pub struct Cli {
    /// Which engine to run. This binary only implements 2 (parallel ACS).
    #[arg(long, default_value_t = 0)]
    pub alg: u32,

    /// Path to the puzzle file.
    #[arg(long)]
    pub file: PathBuf,

    /// Number of sub-colonies (K); clamped to >= 3.
    #[arg(long, default_value_t = 4)]
    pub subcolonies: usize,

    /// Ants per sub-colony (M).
    #[arg(long, default_value_t = 10)]
    pub ants: usize,

    /// Wall-clock timeout in seconds.
    #[arg(long, default_value_t = 120.0)]
    pub timeout: f64,

    /// Exploitation threshold q0.
    #[arg(long, default_value_t = 0.9)]
    pub q0: f64,

    /// Standard global-update evaporation rate.
    #[arg(long, default_value_t = 0.9)]
    pub rho: f64,

    /// Communication global-update evaporation rate.
    #[arg(long, default_value_t = 0.05)]
    pub rhocomm: f64,

    /// bestPher decay per non-communication iteration.
    #[arg(long, default_value_t = 0.005)]
    pub evap: f64,

    /// Emit per-colony progress via the logger.
    #[arg(long, default_value_t = true)]
    pub verbose: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    UnsupportedEngine(u32),
    Puzzle(PuzzleError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsupportedEngine(alg) => write!(
                f,
                "--alg={alg} is not implemented by this binary (only --alg=2, the parallel ACS engine, is)"
            ),
            ConfigError::Puzzle(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<PuzzleError> for ConfigError {
    fn from(e: PuzzleError) -> Self {
        ConfigError::Puzzle(e)
    }
}

/// The resolved configuration the coordinator needs, plus the puzzle itself.
pub struct ResolvedRun {
    pub board: Board,
    pub coordinator_params: CoordinatorParams,
    pub verbose: bool,
}

impl Cli {
    pub fn resolve(&self) -> Result<ResolvedRun, ConfigError> {
        if self.alg != PARALLEL_ACS_ENGINE {
            return Err(ConfigError::UnsupportedEngine(self.alg));
        }

        let puzzle = PuzzleFile::load(&self.file)?;
        let board = puzzle.to_board()?;

        let coordinator_params = CoordinatorParams {
            sub_colonies: self.subcolonies,
            ants: self.ants,
            timeout: Duration::from_secs_f64(self.timeout.max(0.0)),
            q0: self.q0,
            rho: self.rho,
            rho_comm: self.rhocomm,
            best_evap: self.evap,
        };

        Ok(ResolvedRun {
            board,
            coordinator_params,
            verbose: self.verbose,
        })
    }
}

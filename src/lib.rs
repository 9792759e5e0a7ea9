//! Sudoku ACS Solver Library
//!
//! A parallel Ant Colony System (ACS) metaheuristic for generalized N x N
//! Sudoku puzzles (N in {9, 16, 25}).
//!
//! # Features
//!
//! - Bitset-backed board with arc-consistent candidate propagation
//! - Stochastic ant construction with the ACS exploitation/exploration rule
//! - Per-sub-colony local, standard-global and three-source communication
//!   pheromone updates
//! - A barrier-synchronized coordinator running one OS thread per sub-colony,
//!   with ring and random exchange topologies and wall-clock timeout
//!
//! # Example
//!
//! ```no_run
//! use sudoku_acs_solver::puzzle::PuzzleFile;
//! use sudoku_acs_solver::coordinator::{Coordinator, CoordinatorParams};
//! use std::time::Duration;
//!
//! let puzzle = PuzzleFile::load("puzzle.txt").unwrap();
//! let board = puzzle.to_board().unwrap();
//!
//! let coordinator = Coordinator::new(
//!     CoordinatorParams {
//!         sub_colonies: 4,
//!         ants: 10,
//!         timeout: Duration::from_secs(120),
//!         q0: 0.9,
//!         rho: 0.9,
//!         rho_comm: 0.05,
//!         best_evap: 0.005,
//!     },
//!     &board,
//! );
//! let report = coordinator.run(&board);
//! println!("solved: {}", report.solved);
//! ```

pub mod ant;
pub mod board;
pub mod cli;
pub mod coordinator;
pub mod puzzle;
pub mod rng;
pub mod subcolony;
pub mod sweep;

pub use board::Board;
pub use coordinator::{Coordinator, CoordinatorParams, RunReport};
pub use puzzle::{PuzzleError, PuzzleFile};

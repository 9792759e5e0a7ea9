//! Spawns worker threads (one per sub-colony), owns the barrier/stop-flag/
//! condition pair, performs ring and random exchanges as barrier-master,
//! enforces the wall-clock timeout, and returns the global best board.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::board::Board;
use crate::rng;
use crate::subcolony::{SubColony, SubColonyParams};

const MIN_SUB_COLONIES: usize = 3;
const BARRIER_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CoordinatorParams {
    pub sub_colonies: usize,
    pub ants: usize,
    pub timeout: Duration,
    pub q0: f64,
    pub rho: f64,
    pub rho_comm: f64,
    pub best_evap: f64,
}

/// Run outcome, serializable so callers can log it as JSON alongside the
/// plain-text board printed to stdout.
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    pub solved: bool,
    pub elapsed: Duration,
    pub best_board: Board,
    pub iterations_per_colony: Vec<u64>,
}

pub struct Coordinator {
    k: usize,
    sub_colonies: Vec<Mutex<SubColony>>,
    barrier_count: AtomicUsize,
    stop_flag: AtomicBool,
    barrier_mutex: Mutex<()>,
    condvar: Condvar,
    start_time: Instant,
    max_time: Duration,
    exchange_rng: Mutex<ChaCha8Rng>,
    iterations_completed: Vec<AtomicU64>,
}

impl Coordinator {
    pub fn new(params: CoordinatorParams, initial: &Board) -> Self {
        Self::with_seed(params, initial, rng::master_seed())
    }

    /// Like `new`, but takes the master seed explicitly instead of deriving
    /// it from the clock. Used by the seed-sweep harness (`sweep.rs`) to get
    /// reproducible runs across a batch.
    pub fn with_seed(params: CoordinatorParams, initial: &Board, master_seed: u64) -> Self {
        let k = if params.sub_colonies < MIN_SUB_COLONIES {
            log::warn!(
                "--subcolonies={} is below the minimum of {MIN_SUB_COLONIES}; both exchange topologies degenerate below it, clamping to {MIN_SUB_COLONIES}",
                params.sub_colonies
            );
            MIN_SUB_COLONIES
        } else {
            params.sub_colonies
        };

        let colony_params = SubColonyParams {
            m_ants: params.ants,
            q0: params.q0,
            rho: params.rho,
            rho_comm: params.rho_comm,
            best_evap: params.best_evap,
        };

        let sub_colonies = (0..k)
            .map(|id| {
                Mutex::new(SubColony::new(
                    id,
                    initial,
                    &colony_params,
                    rng::colony_rng(master_seed, id),
                ))
            })
            .collect();

        let iterations_completed = (0..k).map(|_| AtomicU64::new(0)).collect();

        Coordinator {
            k,
            sub_colonies,
            barrier_count: AtomicUsize::new(0),
            stop_flag: AtomicBool::new(false),
            barrier_mutex: Mutex::new(()),
            condvar: Condvar::new(),
            start_time: Instant::now(),
            max_time: params.timeout,
            exchange_rng: Mutex::new(rng::colony_rng(master_seed, k)),
            iterations_completed,
        }
    }

    pub fn run(&self, initial: &Board) -> RunReport {
        std::thread::scope(|scope| {
            for id in 0..self.k {
                scope.spawn(move || self.worker_loop(id, initial));
            }
        });
        self.join(initial)
    }

    fn worker_loop(&self, id: usize, initial: &Board) {
        let mut iter: u64 = 1;
        loop {
            if self.stop_flag.load(Ordering::Acquire) {
                break;
            }
            if self.start_time.elapsed() >= self.max_time {
                self.stop_flag.store(true, Ordering::Release);
                break;
            }

            let is_comm = Self::is_communication_iteration(iter);

            {
                let mut colony = self.sub_colonies[id].lock().unwrap();
                colony.run_iteration(initial);
                self.iterations_completed[id].fetch_add(1, Ordering::Relaxed);
                if colony.is_solved() {
                    // Any-colony-wins: a sub-colony reaching a full solution
                    // ends the whole search immediately, not just at the
                    // next communication interval.
                    self.stop_flag.store(true, Ordering::Release);
                } else if !is_comm {
                    colony.update_pheromone_standard();
                    colony.decay_best_pher();
                }
            }

            if self.stop_flag.load(Ordering::Acquire) {
                break;
            }

            if is_comm {
                self.barrier();
                if self.stop_flag.load(Ordering::Acquire) {
                    break;
                }
                let mut colony = self.sub_colonies[id].lock().unwrap();
                if !colony.is_solved() {
                    colony.update_pheromone_with_communication();
                }
            }

            iter += 1;
        }
    }

    fn is_communication_iteration(iter: u64) -> bool {
        let interval = if iter < 200 { 100 } else { 10 };
        iter % interval == 0
    }

    /// Deadlock-free barrier: the `K`th arrival becomes the master and
    /// performs the exchange while every other worker is parked, which is
    /// what makes unsynchronized reads of peer sub-colony state safe during
    /// `do_exchange`.
    fn barrier(&self) {
        if self.stop_flag.load(Ordering::Acquire) {
            return;
        }
        let mut guard = self.barrier_mutex.lock().unwrap();
        if self.stop_flag.load(Ordering::Acquire) {
            self.barrier_count.store(0, Ordering::SeqCst);
            self.condvar.notify_all();
            return;
        }

        let arrived = self.barrier_count.fetch_add(1, Ordering::SeqCst) + 1;
        if arrived == self.k {
            self.do_exchange();
            self.barrier_count.store(0, Ordering::SeqCst);
            self.condvar.notify_all();
        } else {
            loop {
                if self.barrier_count.load(Ordering::SeqCst) == 0
                    || self.stop_flag.load(Ordering::Acquire)
                {
                    break;
                }
                let (next_guard, _timeout_result) =
                    self.condvar.wait_timeout(guard, BARRIER_POLL).unwrap();
                guard = next_guard;
                if self.start_time.elapsed() >= self.max_time {
                    self.stop_flag.store(true, Ordering::Release);
                    self.barrier_count.store(0, Ordering::SeqCst);
                    self.condvar.notify_all();
                    break;
                }
            }
        }
    }

    fn do_exchange(&self) {
        self.ring_exchange();
        self.random_exchange();
        self.stop_check_after_exchange();
    }

    /// Ring exchange of `iteration_best`: snapshot every colony's
    /// iteration-best first, then distribute, so that colony i's received
    /// board never leaks into colony i+1's own snapshot within the same
    /// round.
    fn ring_exchange(&self) {
        let snapshot: Vec<(Board, usize)> = (0..self.k)
            .map(|i| {
                let colony = self.sub_colonies[i].lock().unwrap();
                (colony.iteration_best.clone(), colony.iteration_best_score)
            })
            .collect();

        for i in 0..self.k {
            let next = (i + 1) % self.k;
            let mut colony = self.sub_colonies[next].lock().unwrap();
            colony.receive_iteration_best(&snapshot[i].0, snapshot[i].1);
        }
    }

    /// Random exchange of `best_sol`: a fresh permutation each round,
    /// snapshot-then-distribute with the same rationale as the ring
    /// exchange.
    fn random_exchange(&self) {
        let perm = self.random_permutation();

        let snapshot: Vec<(Board, usize)> = (0..self.k)
            .map(|i| {
                let colony = self.sub_colonies[i].lock().unwrap();
                (colony.best_sol.clone(), colony.best_sol_score)
            })
            .collect();

        for pos in 0..self.k {
            let dst = perm[pos];
            let donor = perm[(pos + self.k - 1) % self.k];
            let mut colony = self.sub_colonies[dst].lock().unwrap();
            colony.receive_best_sol(&snapshot[donor].0, snapshot[donor].1);
        }
    }

    fn random_permutation(&self) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..self.k).collect();
        let mut rng = self.exchange_rng.lock().unwrap();
        // Fisher-Yates shuffle.
        for i in (1..perm.len()).rev() {
            let j = rng.gen_range(0..=i);
            perm.swap(i, j);
        }
        perm
    }

    fn stop_check_after_exchange(&self) {
        for i in 0..self.k {
            let colony = self.sub_colonies[i].lock().unwrap();
            if colony.is_solved() {
                self.stop_flag.store(true, Ordering::Release);
            }
        }
    }

    fn join(&self, initial: &Board) -> RunReport {
        // Ascending scan with a strict `>` keeps the lowest-id colony on
        // ties, without needing to track the winning id separately.
        let mut best_score = 0usize;
        let mut best_board = initial.clone();

        for id in 0..self.k {
            let colony = self.sub_colonies[id].lock().unwrap();
            if colony.best_sol_score > best_score {
                best_score = colony.best_sol_score;
                best_board = colony.best_sol.clone();
            }
        }

        let iterations_per_colony = self
            .iterations_completed
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect();

        RunReport {
            solved: best_score == initial.num_cells(),
            elapsed: self.start_time.elapsed(),
            best_board,
            iterations_per_colony,
        }
    }
}

impl RunReport {
    /// Renders the report as JSON, for callers that want a machine-readable
    /// alternative to the plain-text board on stdout.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PuzzleFile;

    fn params(k: usize, ants: usize, timeout: Duration) -> CoordinatorParams {
        CoordinatorParams {
            sub_colonies: k,
            ants,
            timeout,
            q0: 0.9,
            rho: 0.9,
            rho_comm: 0.05,
            best_evap: 0.005,
        }
    }

    fn fully_fixed_9x9() -> Board {
        // A valid, fully solved 9x9 grid.
        let text = "\
5 3 4 6 7 8 9 1 2
6 7 2 1 9 5 3 4 8
1 9 8 3 4 2 5 6 7
8 5 9 7 6 1 4 2 3
4 2 6 8 5 3 7 9 1
7 1 3 9 2 4 8 5 6
9 6 1 5 3 7 2 8 4
2 8 7 4 1 9 6 3 5
3 4 5 2 8 6 1 7 9";
        let mut cells = Vec::new();
        for line in text.lines() {
            for token in line.split_whitespace() {
                cells.push(Some(token.parse::<u16>().unwrap()));
            }
        }
        let puzzle = PuzzleFile { n: 9, cells };
        puzzle.to_board().expect("fixture must be a valid solved grid")
    }

    #[test]
    fn clamps_k_below_minimum() {
        let initial = Board::empty(9);
        let coordinator = Coordinator::new(params(1, 4, Duration::from_millis(50)), &initial);
        assert_eq!(coordinator.k, MIN_SUB_COLONIES);
    }

    #[test]
    fn already_solved_board_terminates_quickly() {
        let initial = fully_fixed_9x9();
        assert_eq!(initial.cells_filled(), 81);
        let coordinator = Coordinator::new(params(3, 2, Duration::from_secs(5)), &initial);
        let report = coordinator.run(&initial);
        assert!(report.solved);
        assert!(report.elapsed < Duration::from_secs(1));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"solved\":true"));
    }

    #[test]
    fn with_seed_accepts_an_explicit_master_seed() {
        let initial = Board::empty(9);
        let coordinator = Coordinator::with_seed(params(3, 2, Duration::from_millis(50)), &initial, 777);
        let report = coordinator.run(&initial);
        assert_eq!(report.iterations_per_colony.len(), 3);
    }

    #[test]
    fn timeout_path_returns_unsolved_without_panicking() {
        let initial = Board::empty(9);
        let coordinator = Coordinator::new(params(3, 2, Duration::from_millis(50)), &initial);
        let report = coordinator.run(&initial);
        assert!(report.best_board.cells_filled() >= initial.cells_filled());
        assert_eq!(report.iterations_per_colony.len(), 3);
    }

    #[test]
    fn runs_a_short_25x25_coordinator_pass_without_panicking() {
        let initial = Board::empty(25);
        let coordinator = Coordinator::new(params(3, 2, Duration::from_millis(100)), &initial);
        let report = coordinator.run(&initial);
        assert_eq!(report.iterations_per_colony.len(), 3);
        assert!(report.best_board.num_cells() == 625);
        assert!(report.best_board.cells_filled() <= 625);
    }

    #[test]
    fn is_communication_iteration_matches_schedule() {
        assert!(!Coordinator::is_communication_iteration(1));
        assert!(Coordinator::is_communication_iteration(100));
        assert!(!Coordinator::is_communication_iteration(150));
        assert!(Coordinator::is_communication_iteration(200));
        assert!(Coordinator::is_communication_iteration(210));
    }
}

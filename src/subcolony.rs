//! Per-thread ACS instance: pheromone matrix, ant pool, iteration-best /
//! best-so-far tracking, and the two mutually exclusive global pheromone
//! updates.

use rand_chacha::ChaCha8Rng;

use crate::ant;
use crate::board::Board;

/// Pheromone value associated with a fully-solved board; decaying this is
/// harmless (it stays effectively infinite) and any comparison against it
/// always prefers the solved board.
const SOLVED_SENTINEL: f64 = f64::INFINITY;

pub struct SubColony {
    pub id: usize,
    n: usize,
    num_cells: usize,
    m_ants: usize,
    pheromone: Vec<f64>,
    pher0: f64,
    q0: f64,
    rho: f64,
    rho_comm: f64,
    best_evap: f64,

    pub iteration_best: Board,
    pub iteration_best_score: usize,
    pub best_sol: Board,
    pub best_sol_score: usize,
    best_pher: f64,

    pub received_iteration_best: Board,
    pub received_iteration_best_score: usize,
    pub received_best_sol: Board,
    pub received_best_sol_score: usize,

    rng: ChaCha8Rng,
}

pub struct SubColonyParams {
    pub m_ants: usize,
    pub q0: f64,
    pub rho: f64,
    pub rho_comm: f64,
    pub best_evap: f64,
}

impl SubColony {
    pub fn new(id: usize, initial: &Board, params: &SubColonyParams, rng: ChaCha8Rng) -> Self {
        let n = initial.n();
        let num_cells = initial.num_cells();
        let pher0 = 1.0 / num_cells as f64;
        SubColony {
            id,
            n,
            num_cells,
            m_ants: params.m_ants,
            pheromone: vec![pher0; num_cells * n],
            pher0,
            q0: params.q0,
            rho: params.rho,
            rho_comm: params.rho_comm,
            best_evap: params.best_evap,
            iteration_best: initial.clone(),
            iteration_best_score: 0,
            best_sol: initial.clone(),
            best_sol_score: 0,
            best_pher: 0.0,
            received_iteration_best: initial.clone(),
            received_iteration_best_score: 0,
            received_best_sol: initial.clone(),
            received_best_sol_score: 0,
            rng,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.best_sol_score == self.num_cells
    }

    /// `score` is a cell-fill count running up to `num_cells = n^2`, so this
    /// is `num_cells / (num_cells - score)`, not `n / (n - score)` — dividing
    /// by the side length instead of the cell count would go negative for
    /// any score above `n`. See DESIGN.md for the reasoning.
    fn pher_to_add(&self, score: usize) -> f64 {
        if score == self.num_cells {
            SOLVED_SENTINEL
        } else {
            self.num_cells as f64 / (self.num_cells as f64 - score as f64)
        }
    }

    /// Runs all `m_ants` ants sequentially — serializing ants within one
    /// sub-colony sidesteps the pheromone write race without relaxed
    /// atomics — then updates `iteration_best` and, if improved,
    /// `best_sol`/`best_pher`.
    pub fn run_iteration(&mut self, initial: &Board) {
        let mut best_ant_board: Option<Board> = None;
        let mut best_ant_score = 0usize;

        for _ in 0..self.m_ants {
            let result = ant::construct(
                initial,
                &mut self.pheromone,
                self.n,
                self.pher0,
                self.q0,
                &mut self.rng,
            );
            let filled = result.cells_filled();
            if best_ant_board.is_none() || filled > best_ant_score {
                best_ant_score = filled;
                best_ant_board = Some(result.board);
            }
        }

        let winner = best_ant_board.expect("m_ants must be at least 1");
        self.iteration_best.copy_from(&winner);
        self.iteration_best_score = best_ant_score;

        let pher_to_add = self.pher_to_add(self.iteration_best_score);
        if pher_to_add > self.best_pher {
            self.best_sol.copy_from(&winner);
            self.best_sol_score = self.iteration_best_score;
            self.best_pher = pher_to_add;
        }
    }

    /// Standard global update: reinforce every (cell, digit) fixed in
    /// `best_sol` with weight `best_pher`, evaporate nothing else.
    pub fn update_pheromone_standard(&mut self) {
        for i in 0..self.num_cells {
            if let Some(v) = self.best_sol.cell_value_opt(i) {
                let idx = i * self.n + (v as usize - 1);
                self.pheromone[idx] = (1.0 - self.rho) * self.pheromone[idx] + self.rho * self.best_pher;
            }
        }
    }

    /// Called only on non-communication iterations, immediately after
    /// `update_pheromone_standard`.
    pub fn decay_best_pher(&mut self) {
        self.best_pher *= 1.0 - self.best_evap;
    }

    /// Three-source communication update: for each cell, accumulate the
    /// weighted contribution of every source fixed there, then blend only
    /// the touched digits with `rho_comm`. `best_pher` is not touched here.
    pub fn update_pheromone_with_communication(&mut self) {
        let v1 = self.pher_to_add(self.iteration_best_score);
        let v2 = self.pher_to_add(self.received_iteration_best_score);
        let v3 = self.pher_to_add(self.received_best_sol_score);

        let mut contrib = vec![0.0f64; self.n];
        let mut touched = vec![false; self.n];

        for cell in 0..self.num_cells {
            contrib.iter_mut().for_each(|c| *c = 0.0);
            touched.iter_mut().for_each(|t| *t = false);

            for (source, weight) in [
                (&self.iteration_best, v1),
                (&self.received_iteration_best, v2),
                (&self.received_best_sol, v3),
            ] {
                if let Some(d) = source.cell_value_opt(cell) {
                    let slot = d as usize - 1;
                    contrib[slot] += weight;
                    touched[slot] = true;
                }
            }

            for (slot, &is_touched) in touched.iter().enumerate() {
                if is_touched {
                    let idx = cell * self.n + slot;
                    self.pheromone[idx] =
                        self.pheromone[idx] * (1.0 - self.rho_comm) + contrib[slot];
                }
            }
        }
    }

    pub fn receive_iteration_best(&mut self, board: &Board, score: usize) {
        self.received_iteration_best.copy_from(board);
        self.received_iteration_best_score = score;
    }

    pub fn receive_best_sol(&mut self, board: &Board, score: usize) {
        self.received_best_sol.copy_from(board);
        self.received_best_sol_score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::colony_rng;

    fn default_params() -> SubColonyParams {
        SubColonyParams {
            m_ants: 4,
            q0: 0.9,
            rho: 0.9,
            rho_comm: 0.05,
            best_evap: 0.005,
        }
    }

    #[test]
    fn run_iteration_sets_iteration_best() {
        let initial = Board::empty(9);
        let mut colony = SubColony::new(0, &initial, &default_params(), colony_rng(1, 0));
        colony.run_iteration(&initial);
        assert_eq!(colony.iteration_best_score, colony.iteration_best.cells_filled());
        assert!(colony.iteration_best_score <= 81);
    }

    #[test]
    fn run_iteration_works_on_a_25x25_colony() {
        let initial = Board::empty(25);
        let mut colony = SubColony::new(0, &initial, &default_params(), colony_rng(25, 0));
        colony.run_iteration(&initial);
        assert_eq!(colony.iteration_best_score, colony.iteration_best.cells_filled());
        assert!(colony.iteration_best_score <= 625);
        assert_eq!(colony.pheromone.len(), 625 * 25);
    }

    #[test]
    fn standard_update_only_touches_best_sol_fixed_cells() {
        let mut initial = Board::empty(9);
        initial.set_cell(0, 1);
        let mut colony = SubColony::new(0, &initial, &default_params(), colony_rng(2, 0));
        colony.run_iteration(&initial);
        let before = colony.pheromone.clone();
        colony.update_pheromone_standard();
        for i in 0..colony.num_cells {
            if let Some(v) = colony.best_sol.cell_value_opt(i) {
                let idx = i * colony.n + (v as usize - 1);
                assert_ne!(colony.pheromone[idx], before[idx]);
            } else {
                for d in 0..colony.n {
                    let idx = i * colony.n + d;
                    assert_eq!(colony.pheromone[idx], before[idx]);
                }
            }
        }
    }

    #[test]
    fn decay_reduces_best_pher_monotonically() {
        let initial = Board::empty(9);
        let mut colony = SubColony::new(0, &initial, &default_params(), colony_rng(3, 0));
        colony.run_iteration(&initial);
        let before = colony.best_pher;
        colony.decay_best_pher();
        assert!(colony.best_pher <= before);
    }

    #[test]
    fn communication_update_only_touches_cells_fixed_in_a_source() {
        let initial = Board::empty(9);
        let mut colony = SubColony::new(0, &initial, &default_params(), colony_rng(4, 0));
        colony.run_iteration(&initial);
        colony.receive_iteration_best(&initial, 0);
        colony.receive_best_sol(&initial, 0);
        let before = colony.pheromone.clone();
        colony.update_pheromone_with_communication();

        for i in 0..colony.num_cells {
            let any_source_fixed = colony.iteration_best.cell_value_opt(i).is_some()
                || colony.received_iteration_best.cell_value_opt(i).is_some()
                || colony.received_best_sol.cell_value_opt(i).is_some();
            if !any_source_fixed {
                for d in 0..colony.n {
                    let idx = i * colony.n + d;
                    assert_eq!(colony.pheromone[idx], before[idx]);
                }
            }
        }
    }

    #[test]
    fn best_pher_decays_exactly_when_score_improves() {
        let initial = Board::empty(9);
        let mut colony = SubColony::new(0, &initial, &default_params(), colony_rng(5, 0));
        colony.run_iteration(&initial);
        let expected =
            colony.num_cells as f64 / (colony.num_cells as f64 - colony.best_sol_score as f64);
        assert!((colony.best_pher - expected).abs() < 1e-9);
    }
}

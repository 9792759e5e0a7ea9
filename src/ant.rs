//! Stochastic solution construction.
//!
//! An ant never owns its colony: it borrows the initial puzzle, a mutable
//! pheromone row slice and the colony's RNG for the duration of one
//! construction, then returns its finished board. This keeps construction a
//! plain function instead of a back-pointer-carrying object, avoiding an
//! Ant -> SubColony pointer cycle.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::board::Board;

/// The outcome of one ant's construction pass.
pub struct AntResult {
    pub board: Board,
    pub fail_cells: usize,
}

impl AntResult {
    pub fn cells_filled(&self) -> usize {
        self.board.cells_filled()
    }
}

/// Runs one ant over `initial`, reading/writing `pheromone` (a flattened
/// `num_cells * n` row-major matrix belonging to the owning sub-colony) and
/// drawing from `rng`.
///
/// `q0` is the exploitation threshold; the comparison is intentionally
/// `u > q0` (exploitation), not the textbook `u < q0` — preserve this, it is
/// not a bug.
pub fn construct(
    initial: &Board,
    pheromone: &mut [f64],
    n: usize,
    pher0: f64,
    q0: f64,
    rng: &mut ChaCha8Rng,
) -> AntResult {
    let num_cells = initial.num_cells();
    let mut sol = initial.clone();
    let mut fail_cells = 0;
    let mut current_cell = rng.gen_range(0..num_cells);

    for _ in 0..num_cells {
        if !sol.cell_is_fixed(current_cell) {
            if sol.candidate_count(current_cell) == 0 {
                fail_cells += 1;
            } else {
                let v = select_value(&sol, current_cell, pheromone, n, q0, rng);
                sol.set_cell(current_cell, v);
                local_update(pheromone, n, current_cell, v, pher0);
            }
        }
        current_cell = (current_cell + 1) % num_cells;
    }

    AntResult {
        board: sol,
        fail_cells,
    }
}

fn select_value(
    sol: &Board,
    cell: usize,
    pheromone: &[f64],
    n: usize,
    q0: f64,
    rng: &mut ChaCha8Rng,
) -> u16 {
    let u: f64 = rng.gen();
    if u > q0 {
        exploit(sol, cell, pheromone, n)
    } else {
        explore(sol, cell, pheromone, n, rng)
    }
}

fn exploit(sol: &Board, cell: usize, pheromone: &[f64], n: usize) -> u16 {
    let mut best_v = 0u16;
    let mut best_tau = f64::NEG_INFINITY;
    for v in sol.candidates(cell) {
        let tau = pheromone[cell * n + (v as usize - 1)];
        if tau > best_tau {
            best_tau = tau;
            best_v = v;
        }
    }
    best_v
}

fn explore(sol: &Board, cell: usize, pheromone: &[f64], n: usize, rng: &mut ChaCha8Rng) -> u16 {
    let total: f64 = sol
        .candidates(cell)
        .map(|v| pheromone[cell * n + (v as usize - 1)])
        .sum();
    let r: f64 = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_v = 0u16;
    for v in sol.candidates(cell) {
        cumulative += pheromone[cell * n + (v as usize - 1)];
        last_v = v;
        if cumulative > r {
            return v;
        }
    }
    // Floating point rounding can leave `cumulative` a hair under `r`;
    // fall back to the last candidate rather than returning 0.
    last_v
}

fn local_update(pheromone: &mut [f64], n: usize, cell: usize, v: u16, pher0: f64) {
    let idx = cell * n + (v as usize - 1);
    pheromone[idx] = 0.9 * pheromone[idx] + 0.1 * pher0;
}

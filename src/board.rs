//! Grid state for a generalized N x N Sudoku puzzle.
//!
//! Candidate sets are tracked as a bitmask per cell (bit `d-1` set means
//! digit `d` is still possible), which keeps `set_cell` and `copy_from`
//! linear in the number of cells regardless of `n`.

/// A square Sudoku grid, N in {9, 16, 25}.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Board {
    n: usize,
    sub_side: usize,
    /// `None` while unfixed, `Some(v)` (1-indexed) once assigned.
    values: Vec<Option<u16>>,
    /// Bit `d - 1` set means digit `d` is a candidate for the cell.
    candidates: Vec<u32>,
    cells_filled: usize,
}

impl Board {
    /// Builds a board with no cells fixed and every candidate open.
    pub fn empty(n: usize) -> Self {
        let sub_side = (n as f64).sqrt().round() as usize;
        assert_eq!(sub_side * sub_side, n, "n must be a perfect square, got {n}");
        let num_cells = n * n;
        let full_mask = full_candidate_mask(n);
        Board {
            n,
            sub_side,
            values: vec![None; num_cells],
            candidates: vec![full_mask; num_cells],
            cells_filled: 0,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn num_cells(&self) -> usize {
        self.n * self.n
    }

    pub fn sub_side(&self) -> usize {
        self.sub_side
    }

    pub fn cell_is_fixed(&self, i: usize) -> bool {
        self.values[i].is_some()
    }

    /// Panics if the cell is not fixed; callers must check `cell_is_fixed` first.
    pub fn cell_value(&self, i: usize) -> u16 {
        self.values[i].expect("cell_value called on an unfixed cell")
    }

    pub fn cell_value_opt(&self, i: usize) -> Option<u16> {
        self.values[i]
    }

    /// Iterates the 1-indexed digits still possible at cell `i`.
    pub fn candidates(&self, i: usize) -> impl Iterator<Item = u16> + '_ {
        let mask = self.candidates[i];
        (1..=self.n as u16).filter(move |d| mask & (1 << (d - 1)) != 0)
    }

    pub fn candidate_count(&self, i: usize) -> u32 {
        self.candidates[i].count_ones()
    }

    pub fn has_candidate(&self, i: usize, v: u16) -> bool {
        self.candidates[i] & (1 << (v - 1)) != 0
    }

    pub fn cells_filled(&self) -> usize {
        self.cells_filled
    }

    /// Fixes cell `i` to value `v` and prunes `v` from every row/column/block
    /// peer's candidate set. `v` must be a current candidate of `i`: this is
    /// a precondition, not a recoverable error.
    pub fn set_cell(&mut self, i: usize, v: u16) {
        assert!(
            self.has_candidate(i, v),
            "set_cell({i}, {v}): {v} is not a candidate of cell {i} (candidates: {:?})",
            self.candidates(i).collect::<Vec<_>>()
        );
        if self.values[i].is_none() {
            self.cells_filled += 1;
        }
        self.values[i] = Some(v);
        self.candidates[i] = 0;
        let bit = 1u32 << (v - 1);
        for peer in self.peers_of(i) {
            self.candidates[peer] &= !bit;
        }
    }

    /// Overwrites `self` in place with the contents of `other`. Used to copy
    /// an ant's working board back into iteration-best / best-so-far slots
    /// without reallocating on every iteration.
    pub fn copy_from(&mut self, other: &Board) {
        self.n = other.n;
        self.sub_side = other.sub_side;
        self.values.clone_from(&other.values);
        self.candidates.clone_from(&other.candidates);
        self.cells_filled = other.cells_filled;
    }

    /// All distinct row/column/block peers of cell `i`, excluding `i` itself.
    pub fn peers_of(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        let n = self.n;
        let sub_side = self.sub_side;
        let row = i / n;
        let col = i % n;
        let block_row = (row / sub_side) * sub_side;
        let block_col = (col / sub_side) * sub_side;

        let row_peers = (0..n).map(move |c| row * n + c);
        let col_peers = (0..n).map(move |r| r * n + col);
        let block_peers = (0..sub_side).flat_map(move |br| {
            (0..sub_side).map(move |bc| (block_row + br) * n + (block_col + bc))
        });

        row_peers
            .chain(col_peers)
            .chain(block_peers)
            .filter(move |&p| p != i)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
    }

    /// Renders the board back to the textual puzzle format, with unfixed
    /// cells written as `0`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.n.to_string());
        out.push('\n');
        for row in 0..self.n {
            let line: Vec<String> = (0..self.n)
                .map(|col| {
                    let i = row * self.n + col;
                    match self.values[i] {
                        Some(v) => v.to_string(),
                        None => "0".to_string(),
                    }
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

fn full_candidate_mask(n: usize) -> u32 {
    (1u32 << n) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_has_full_candidates() {
        let b = Board::empty(9);
        assert_eq!(b.num_cells(), 81);
        assert_eq!(b.candidate_count(0), 9);
        assert_eq!(b.cells_filled(), 0);
    }

    #[test]
    fn set_cell_prunes_row_col_block_peers() {
        let mut b = Board::empty(9);
        b.set_cell(0, 5); // row 0, col 0, block 0
        assert!(b.cell_is_fixed(0));
        assert_eq!(b.cell_value(0), 5);
        // row peer
        assert!(!b.has_candidate(1, 5));
        // column peer
        assert!(!b.has_candidate(9, 5));
        // block peer
        assert!(!b.has_candidate(10, 5));
        // unrelated cell untouched
        assert!(b.has_candidate(80, 5));
        assert_eq!(b.cells_filled(), 1);
    }

    #[test]
    #[should_panic(expected = "is not a candidate")]
    fn set_cell_rejects_pruned_value() {
        let mut b = Board::empty(9);
        b.set_cell(0, 5);
        b.set_cell(1, 5); // 5 was pruned from cell 1 by the row rule
    }

    #[test]
    fn copy_from_duplicates_state() {
        let mut a = Board::empty(16);
        a.set_cell(0, 3);
        let mut b = Board::empty(16);
        b.copy_from(&a);
        assert_eq!(b.cells_filled(), 1);
        assert_eq!(b.cell_value(0), 3);
        assert!(!b.has_candidate(1, 3));
    }

    #[test]
    fn peers_of_count_matches_theory() {
        let b = Board::empty(9);
        // row (8) + col (8) + block (4 new, since 4 overlap with row/col) = 20
        assert_eq!(b.peers_of(0).count(), 20);
    }

    #[test]
    fn empty_25x25_board_uses_the_full_25_bit_mask() {
        let b = Board::empty(25);
        assert_eq!(b.num_cells(), 625);
        assert_eq!(b.sub_side(), 5);
        assert_eq!(b.candidate_count(0), 25);
        assert!(b.has_candidate(0, 25));
        assert!(!b.has_candidate(0, 26));
    }

    #[test]
    fn set_cell_prunes_peers_on_a_25x25_board() {
        let mut b = Board::empty(25);
        b.set_cell(0, 25); // row 0, col 0, block 0
        assert_eq!(b.cell_value(0), 25);
        // row peer
        assert!(!b.has_candidate(1, 25));
        // column peer
        assert!(!b.has_candidate(25, 25));
        // block peer (row 1, col 1 of the 5x5 block)
        assert!(!b.has_candidate(26, 25));
        // unrelated cell untouched
        assert!(b.has_candidate(624, 25));
        assert_eq!(b.cells_filled(), 1);
        // row(24) + col(24) + block(16 new) = 64
        assert_eq!(b.peers_of(0).count(), 64);
    }
}

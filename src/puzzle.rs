//! Loading the textual puzzle format.
//!
//! First line: `N` (9/16/25). Then `N` lines of `N` whitespace-separated
//! tokens; `0` or `.` is an unfixed cell, otherwise a digit in `1..=N`.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::board::Board;

const VALID_SIZES: [usize; 3] = [9, 16, 25];

#[derive(Debug)]
pub enum PuzzleError {
    Io(std::io::Error),
    MissingHeader,
    InvalidSize(usize),
    RowCountMismatch { expected: usize, found: usize },
    TokenCountMismatch { row: usize, expected: usize, found: usize },
    BadToken { row: usize, col: usize, token: String },
    UniquenessViolation { row: usize, col: usize, value: u16 },
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::Io(e) => write!(f, "failed to read puzzle file: {e}"),
            PuzzleError::MissingHeader => write!(f, "puzzle file is missing its N header line"),
            PuzzleError::InvalidSize(n) => {
                write!(f, "unsupported puzzle size {n} (expected 9, 16, or 25)")
            }
            PuzzleError::RowCountMismatch { expected, found } => write!(
                f,
                "expected {expected} rows, found {found}"
            ),
            PuzzleError::TokenCountMismatch { row, expected, found } => write!(
                f,
                "row {row}: expected {expected} tokens, found {found}"
            ),
            PuzzleError::BadToken { row, col, token } => {
                write!(f, "row {row} col {col}: invalid token {token:?}")
            }
            PuzzleError::UniquenessViolation { row, col, value } => write!(
                f,
                "row {row} col {col}: fixed value {value} violates row/column/block uniqueness"
            ),
        }
    }
}

impl std::error::Error for PuzzleError {}

impl From<std::io::Error> for PuzzleError {
    fn from(e: std::io::Error) -> Self {
        PuzzleError::Io(e)
    }
}

/// A parsed-but-not-yet-propagated puzzle: fixed cells only, no candidate
/// inference performed yet (that happens in `to_board`).
pub struct PuzzleFile {
    pub n: usize,
    pub cells: Vec<Option<u16>>,
}

impl PuzzleFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PuzzleError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = lines.next().ok_or(PuzzleError::MissingHeader)??;
        let n: usize = header
            .trim()
            .parse()
            .map_err(|_| PuzzleError::MissingHeader)?;
        if !VALID_SIZES.contains(&n) {
            return Err(PuzzleError::InvalidSize(n));
        }

        let mut cells = vec![None; n * n];
        let mut row_count = 0;
        for (row, line) in lines.enumerate() {
            if row >= n {
                break;
            }
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != n {
                return Err(PuzzleError::TokenCountMismatch {
                    row,
                    expected: n,
                    found: tokens.len(),
                });
            }
            for (col, token) in tokens.iter().enumerate() {
                if *token == "0" || *token == "." {
                    continue;
                }
                let value: u16 = token
                    .parse()
                    .map_err(|_| PuzzleError::BadToken {
                        row,
                        col,
                        token: token.to_string(),
                    })?;
                if value == 0 || value as usize > n {
                    return Err(PuzzleError::BadToken {
                        row,
                        col,
                        token: token.to_string(),
                    });
                }
                cells[row * n + col] = Some(value);
            }
            row_count += 1;
        }
        if row_count != n {
            return Err(PuzzleError::RowCountMismatch {
                expected: n,
                found: row_count,
            });
        }

        Ok(PuzzleFile { n, cells })
    }

    /// Performs candidate inference: start every unfixed cell with the full
    /// candidate set, then fix cells in file order, relying on
    /// `Board::set_cell`'s peer-pruning to reach the same fixed point
    /// regardless of order.
    pub fn to_board(&self) -> Result<Board, PuzzleError> {
        let mut board = Board::empty(self.n);
        for (i, cell) in self.cells.iter().enumerate() {
            if let Some(value) = cell {
                if !board.has_candidate(i, *value) {
                    return Err(PuzzleError::UniquenessViolation {
                        row: i / self.n,
                        col: i % self.n,
                        value: *value,
                    });
                }
                board.set_cell(i, *value);
            }
        }
        Ok(board)
    }
}

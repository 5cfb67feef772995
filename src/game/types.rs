//! Core domain types for the tic-tac-toe session.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// A player's mark. X is assigned to the session creator and always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// Mark X (creator, moves first).
    X,
    /// Mark O (joiner, moves second).
    O,
}

impl Mark {
    /// Returns the other mark. Applying this twice returns the original mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell holding a player's mark.
    Marked(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Boards are immutable values: [`Board::with_move`] returns a fresh board
/// and never touches the original, so callers can hold "before" and "after"
/// snapshots of the same game side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    /// Checks if the cell at the given position is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Cell::Empty)
    }

    /// Returns a new board equal to this one except the given cell holds `mark`.
    ///
    /// Performs no occupancy validation; legality is the session layer's
    /// concern (see [`super::contracts::LegalMove`]).
    pub fn with_move(&self, pos: Position, mark: Mark) -> Self {
        let mut cells = self.cells;
        cells[pos.index()] = Cell::Marked(mark);
        Self { cells }
    }

    /// Returns all cells as a slice, row-major.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let symbol = match self.cells[row * 3 + col] {
                    Cell::Empty => ".".to_string(),
                    Cell::Marked(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle status of a game session, as persisted on the wire.
///
/// `Completed` always carries a winner in the session record; a full board
/// with no winner is persisted as `Draw`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    /// Creator seated as X, O seat open.
    Waiting,
    /// Both seats filled, moves accepted.
    Active,
    /// A move produced a winning line, or a participant forfeited.
    Completed,
    /// The board filled without a winner.
    Draw,
}

impl SessionStatus {
    /// True while the session accepts moves.
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    /// True before an opponent has claimed the O seat.
    pub fn is_waiting(self) -> bool {
        matches!(self, SessionStatus::Waiting)
    }

    /// True once the session reached a terminal state. Terminal is final:
    /// no further moves are accepted.
    pub fn is_finished(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Draw)
    }
}

/// Outcome of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The mark that completed a line, or whose opponent forfeited.
    Winner(Mark),
    /// Board full, no winning line.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the session ended in a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{} wins", mark),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

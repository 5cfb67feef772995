//! Cell positions on the 3x3 board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the board, addressed by row and column in `{0, 1, 2}`.
///
/// Positions are a closed enum rather than raw `(row, col)` pairs so that
/// out-of-range coordinates are unrepresentable past the parsing boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Position {
    /// Row 0, column 0.
    TopLeft,
    /// Row 0, column 1.
    TopCenter,
    /// Row 0, column 2.
    TopRight,
    /// Row 1, column 0.
    MiddleLeft,
    /// Row 1, column 1.
    Center,
    /// Row 1, column 2.
    MiddleRight,
    /// Row 2, column 0.
    BottomLeft,
    /// Row 2, column 1.
    BottomCenter,
    /// Row 2, column 2.
    BottomRight,
}

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Converts to a row-major board index (0-8).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The row of this position (0-2).
    pub fn row(self) -> usize {
        self.index() / 3
    }

    /// The column of this position (0-2).
    pub fn col(self) -> usize {
        self.index() % 3
    }

    /// Creates a position from row and column coordinates.
    ///
    /// Returns `None` when either coordinate falls outside `{0, 1, 2}`.
    #[instrument]
    pub fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row > 2 || col > 2 {
            return None;
        }
        Some(Self::ALL[row * 3 + col])
    }

    /// Positions whose cells are empty on the given board.
    #[instrument(skip(board))]
    pub fn open_cells(board: &super::Board) -> Vec<Position> {
        <Position as strum::IntoEnumIterator>::iter()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

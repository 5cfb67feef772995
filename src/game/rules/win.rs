//! Win detection logic.

use super::super::{Board, Mark, Position};
use tracing::instrument;

/// The 8 winning lines, scanned rows first, then columns, then diagonals.
///
/// Under legal play at most one mark can hold a complete line, so scan
/// order never changes the result.
const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if a mark holds three in a row.
///
/// Returns `Some(mark)` for the first complete line found, `None` if no
/// line is complete.
#[instrument]
pub fn check_winner(board: &Board) -> Option<Mark> {
    for [a, b, c] in LINES {
        let cell = board.get(a);
        if cell.mark().is_some() && cell == board.get(b) && cell == board.get(c) {
            return cell.mark();
        }
    }

    None
}

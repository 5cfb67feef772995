//! Precondition checks for move submission.
//!
//! The rules engine performs no validation of its own; every legality
//! check lives here as a named precondition so the session layer can
//! reject a move before issuing any write.

use super::action::{MoveError, PlayerMove};
use super::{Board, Mark, SessionStatus};
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: The session must be accepting moves.
///
/// Terminal sessions stay terminal; the store never rejects a write on a
/// finished record, so this check is the only gate.
pub struct SessionActive;

impl SessionActive {
    /// Checks the session status.
    #[instrument]
    pub fn check(status: SessionStatus) -> Result<(), MoveError> {
        if status.is_active() {
            Ok(())
        } else {
            Err(MoveError::NotActive(status))
        }
    }
}

/// Precondition: The acting mark must match the session's current turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Checks the move against the current turn.
    #[instrument]
    pub fn check(mov: &PlayerMove, turn: Mark) -> Result<(), MoveError> {
        if mov.mark == turn {
            Ok(())
        } else {
            Err(MoveError::WrongTurn(mov.mark))
        }
    }
}

/// Precondition: The target cell must be empty.
pub struct CellIsEmpty;

impl CellIsEmpty {
    /// Checks the move target against the board.
    #[instrument(skip(board))]
    pub fn check(mov: &PlayerMove, board: &Board) -> Result<(), MoveError> {
        if board.is_empty(mov.position) {
            Ok(())
        } else {
            Err(MoveError::CellOccupied(mov.position))
        }
    }
}

/// Composite precondition: a move is legal iff the session is active, it is
/// the mover's turn, and the target cell is empty.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(board))]
    pub fn check(
        mov: &PlayerMove,
        status: SessionStatus,
        turn: Mark,
        board: &Board,
    ) -> Result<(), MoveError> {
        SessionActive::check(status)?;
        PlayersTurn::check(mov, turn)?;
        CellIsEmpty::check(mov, board)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Position;
    use super::*;

    #[test]
    fn test_legal_move_on_fresh_board() {
        let mov = PlayerMove::new(Mark::X, Position::Center);
        let board = Board::new();
        assert!(LegalMove::check(&mov, SessionStatus::Active, Mark::X, &board).is_ok());
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let board = Board::new().with_move(Position::Center, Mark::X);
        let mov = PlayerMove::new(Mark::O, Position::Center);
        assert_eq!(
            LegalMove::check(&mov, SessionStatus::Active, Mark::O, &board),
            Err(MoveError::CellOccupied(Position::Center))
        );
    }

    #[test]
    fn test_wrong_turn_rejected() {
        let mov = PlayerMove::new(Mark::O, Position::Center);
        assert_eq!(
            LegalMove::check(&mov, SessionStatus::Active, Mark::X, &Board::new()),
            Err(MoveError::WrongTurn(Mark::O))
        );
    }

    #[test]
    fn test_inactive_session_rejected() {
        let mov = PlayerMove::new(Mark::X, Position::Center);
        for status in [
            SessionStatus::Waiting,
            SessionStatus::Completed,
            SessionStatus::Draw,
        ] {
            assert_eq!(
                LegalMove::check(&mov, status, Mark::X, &Board::new()),
                Err(MoveError::NotActive(status))
            );
        }
    }
}

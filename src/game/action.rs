//! First-class move actions and their failure modes.

use super::{Mark, Position, SessionStatus};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A move: a participant placing their mark at a position.
///
/// Moves are domain events, validated independently of execution and
/// logged as such.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMove {
    /// The mark being placed.
    pub mark: Mark,
    /// The target cell.
    pub position: Position,
}

impl PlayerMove {
    /// Creates a new move.
    #[instrument]
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }
}

impl std::fmt::Display for PlayerMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position)
    }
}

/// Reasons a move is rejected before any write is issued.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The target cell already holds a mark.
    #[display("cell {} is already occupied", _0)]
    CellOccupied(Position),

    /// The session does not accept moves in its current status.
    #[display("session is not active (status: {})", _0)]
    NotActive(SessionStatus),

    /// The acting mark does not match the session's current turn.
    #[display("it is not {}'s turn", _0)]
    WrongTurn(Mark),

    /// The caller holds no seat in the session.
    #[display("caller is not a participant in this session")]
    NotAPlayer,
}

impl std::error::Error for MoveError {}

//! Persisted shape of a game session.
//!
//! This is the document two clients share through the store. Field names
//! match the production collection: camelCase keys, an `X`/`O` seat map,
//! and the board serialized as a JSON string because the store does not
//! accept nested array values. The string indirection is an encoding
//! detail only; decode with [`GameSessionRecord::decode_board`] before
//! handing the grid to the rules engine.

use crate::game::{Board, Mark, Outcome, Position, SessionStatus};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Seat assignments: which participant plays which mark.
///
/// The O seat is empty while the session waits for an opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Seats {
    /// Participant seated as X (always the creator).
    #[serde(rename = "X")]
    x: String,
    /// Participant seated as O, if one has joined.
    #[serde(rename = "O")]
    o: Option<String>,
}

/// The shared session record.
///
/// Records are functional values: the update helpers return a modified
/// copy, and the store stamps `updatedAt` when a write is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GameSessionRecord {
    /// JSON-serialized 3x3 grid, each cell `"X"`, `"O"`, or `null`.
    board: String,
    /// Mark that moves next.
    current_turn: Mark,
    /// Seat assignments.
    players: Seats,
    /// Winning mark, set on completion (including forfeit).
    winner: Option<Mark>,
    /// Lifecycle status.
    status: SessionStatus,
    /// Participant who created the session.
    created_by: String,
    /// Store-assigned creation time.
    created_at: DateTime<Utc>,
    /// Store-assigned time of the last accepted write.
    updated_at: DateTime<Utc>,
}

impl GameSessionRecord {
    /// Creates the record for a freshly opened session: creator seated as
    /// X, empty board, X to move, waiting for an opponent.
    #[instrument(skip(creator))]
    pub fn waiting(creator: impl Into<String>) -> Self {
        let creator = creator.into();
        let now = Utc::now();
        Self {
            board: encode_board(&Board::new()),
            current_turn: Mark::X,
            players: Seats::new(creator.clone(), None),
            winner: None,
            status: SessionStatus::Waiting,
            created_by: creator,
            created_at: now,
            updated_at: now,
        }
    }

    /// Decodes the board payload into a typed grid.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the payload is not valid JSON or is not
    /// a 3x3 grid.
    pub fn decode_board(&self) -> Result<Board, RecordError> {
        decode_board(&self.board)
    }

    /// Returns the mark held by the given participant, if seated.
    pub fn mark_of(&self, user_id: &str) -> Option<Mark> {
        if self.players.x() == user_id {
            Some(Mark::X)
        } else if self.players.o().as_deref() == Some(user_id) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Returns the participant seated with the given mark.
    pub fn seat(&self, mark: Mark) -> Option<&str> {
        match mark {
            Mark::X => Some(self.players.x()),
            Mark::O => self.players.o().as_deref(),
        }
    }

    /// Derives the outcome from the persisted status and winner fields.
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.status, self.winner) {
            (SessionStatus::Completed, Some(mark)) => Some(Outcome::Winner(mark)),
            (SessionStatus::Draw, _) => Some(Outcome::Draw),
            _ => None,
        }
    }

    /// Returns a copy with the O seat claimed and the session activated.
    #[instrument(skip(self, joiner))]
    pub fn claim_o_seat(&self, joiner: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.players = Seats::new(self.players.x().clone(), Some(joiner.into()));
        next.status = SessionStatus::Active;
        next
    }

    /// Returns a copy carrying a new board and the mark that moves next.
    #[instrument(skip(self, board))]
    pub fn with_board(&self, board: &Board, next_turn: Mark) -> Self {
        let mut next = self.clone();
        next.board = encode_board(board);
        next.current_turn = next_turn;
        next
    }

    /// Returns a copy with the terminal fields set for the given outcome.
    #[instrument(skip(self))]
    pub fn with_outcome(&self, outcome: Outcome) -> Self {
        let mut next = self.clone();
        match outcome {
            Outcome::Winner(mark) => {
                next.winner = Some(mark);
                next.status = SessionStatus::Completed;
            }
            Outcome::Draw => {
                next.status = SessionStatus::Draw;
            }
        }
        next
    }

    /// Stamps both timestamps. Called by the store when a record is first
    /// accepted, mirroring server-assigned creation times.
    pub(crate) fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }

    /// Stamps the update timestamp. Called by the store on every accepted
    /// write.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Encodes a board as the wire string: a JSON 3x3 array of `"X"`, `"O"`,
/// or `null`.
pub fn encode_board(board: &Board) -> String {
    let mut grid = [[None::<Mark>; 3]; 3];
    for pos in Position::ALL {
        grid[pos.row()][pos.col()] = board.get(pos).mark();
    }

    serde_json::to_string(&grid).expect("grid of marks always serializes")
}

/// Decodes the wire string back into a typed board.
///
/// # Errors
///
/// Returns [`RecordError`] if the payload is not valid JSON or the grid
/// is not 3x3.
#[instrument(skip(payload))]
pub fn decode_board(payload: &str) -> Result<Board, RecordError> {
    let grid: Vec<Vec<Option<Mark>>> = serde_json::from_str(payload)
        .map_err(|e| RecordError::MalformedBoard(e.to_string()))?;

    if grid.len() != 3 || grid.iter().any(|row| row.len() != 3) {
        return Err(RecordError::BadShape);
    }

    let mut board = Board::new();
    for (row, cells) in grid.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let (Some(mark), Some(pos)) = (cell, Position::from_row_col(row, col)) {
                board = board.with_move(pos, *mark);
            }
        }
    }
    Ok(board)
}

/// Errors raised while decoding a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RecordError {
    /// The board payload is not valid JSON for a grid of marks.
    #[display("malformed board payload: {}", _0)]
    MalformedBoard(String),

    /// The board payload parsed but is not a 3x3 grid.
    #[display("board payload is not a 3x3 grid")]
    BadShape,
}

impl std::error::Error for RecordError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_codec_round_trip() {
        let board = Board::new()
            .with_move(Position::TopLeft, Mark::X)
            .with_move(Position::Center, Mark::O);
        let decoded = decode_board(&encode_board(&board)).expect("decodes");
        assert_eq!(decoded, board);
    }

    #[test]
    fn test_decode_production_payload() {
        // Shape written by the production collection: nested arrays of
        // "X" / "O" / null.
        let payload = r#"[["X",null,null],[null,"O",null],[null,null,null]]"#;
        let board = decode_board(payload).expect("decodes");
        assert_eq!(board.get(Position::TopLeft).mark(), Some(Mark::X));
        assert_eq!(board.get(Position::Center).mark(), Some(Mark::O));
        assert!(board.is_empty(Position::BottomRight));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_board("not json"),
            Err(RecordError::MalformedBoard(_))
        ));
        assert_eq!(decode_board("[[null,null],[null,null]]"), Err(RecordError::BadShape));
    }

    #[test]
    fn test_wire_field_names() {
        let record = GameSessionRecord::waiting("user-1");
        let json = serde_json::to_value(&record).expect("serializes");

        assert_eq!(json["currentTurn"], "X");
        assert_eq!(json["status"], "waiting");
        assert_eq!(json["createdBy"], "user-1");
        assert_eq!(json["players"]["X"], "user-1");
        assert!(json["players"]["O"].is_null());
        assert!(json["winner"].is_null());
        assert!(json["board"].is_string());
    }

    #[test]
    fn test_seat_lifecycle() {
        let record = GameSessionRecord::waiting("alice");
        assert_eq!(record.mark_of("alice"), Some(Mark::X));
        assert_eq!(record.mark_of("bob"), None);
        assert_eq!(record.seat(Mark::O), None);

        let active = record.claim_o_seat("bob");
        assert_eq!(active.mark_of("bob"), Some(Mark::O));
        assert_eq!(active.seat(Mark::O), Some("bob"));
        assert!(active.status().is_active());
        // The original record is untouched.
        assert!(record.status().is_waiting());
    }

    #[test]
    fn test_outcome_derivation() {
        let record = GameSessionRecord::waiting("alice").claim_o_seat("bob");
        assert_eq!(record.outcome(), None);

        let won = record.with_outcome(Outcome::Winner(Mark::X));
        assert_eq!(won.outcome(), Some(Outcome::Winner(Mark::X)));
        assert!(won.status().is_finished());

        let drawn = record.with_outcome(Outcome::Draw);
        assert_eq!(drawn.outcome(), Some(Outcome::Draw));
        assert_eq!(*drawn.winner(), None);
    }
}

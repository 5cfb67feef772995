//! Game session protocol.
//!
//! Two clients share one [`GameSessionRecord`] through a [`DocumentStore`]:
//! the creator opens the session seated as X, an opponent claims the O
//! seat, and both submit moves by reading the current snapshot, validating
//! locally, and writing the whole record back. There is no authoritative
//! process between them; turn discipline is enforced entirely by the
//! preconditions in [`crate::game::contracts`], and every write that
//! depends on prior state carries the revision it was computed from so a
//! stale snapshot is rejected instead of silently overwriting a peer's
//! move.
//!
//! Clients consume pushed snapshots through a [`SessionHandle`], which
//! owns its subscription and re-derives seat and turn from each push. The
//! handle is the only session state a client holds; dropping it tears the
//! subscription down.

use crate::game::contracts::LegalMove;
use crate::game::Board;
use crate::game::{rules, Mark, MoveError, Outcome, PlayerMove, Position, SessionStatus};
use crate::record::{GameSessionRecord, RecordError};
use crate::store::{DocumentStore, DocumentWatch, StoreError, Versioned};
use derive_getters::Getters;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A client's view of a session snapshot.
///
/// Derived fresh from every pushed document; never cache `my_turn` or the
/// board across pushes, the next snapshot replaces them wholesale.
#[derive(Debug, Clone, Getters)]
pub struct SessionView {
    /// Session id.
    session_id: String,
    /// Store revision this view was derived from.
    revision: u64,
    /// Decoded board.
    board: Board,
    /// Mark that moves next.
    turn: Mark,
    /// Lifecycle status.
    status: SessionStatus,
    /// Outcome, once the session finished.
    outcome: Option<Outcome>,
    /// The viewing client's seat, if seated.
    my_mark: Option<Mark>,
    /// True iff the session is active and it is the viewing client's turn.
    my_turn: bool,
}

impl SessionView {
    /// Derives a view from a pushed snapshot for the given participant.
    #[instrument(skip(snapshot))]
    pub fn derive(
        session_id: &str,
        snapshot: &Versioned,
        user_id: &str,
    ) -> Result<Self, RecordError> {
        let record = snapshot.record();
        let board = record.decode_board()?;
        let my_mark = record.mark_of(user_id);
        let my_turn = record.status().is_active() && my_mark == Some(*record.current_turn());

        Ok(Self {
            session_id: session_id.to_string(),
            revision: *snapshot.revision(),
            board,
            turn: *record.current_turn(),
            status: *record.status(),
            outcome: record.outcome(),
            my_mark,
            my_turn,
        })
    }
}

/// Creates a new session with the caller seated as X.
///
/// Returns the store-assigned session id to share with an opponent.
#[instrument(skip(store))]
pub async fn create_session(
    store: &Arc<dyn DocumentStore>,
    user_id: &str,
) -> Result<String, SessionError> {
    let record = GameSessionRecord::waiting(user_id);
    let session_id = store.insert(record).await?;
    info!(session_id = %session_id, user_id, "Session created, waiting for opponent");
    Ok(session_id)
}

/// Claims the O seat for the caller and activates the session.
///
/// The claim is a conditional write on the revision observed at read
/// time: when two participants race for the seat, exactly one write is
/// accepted and the loser sees a revision conflict.
///
/// # Errors
///
/// Fails if the session is not waiting for an opponent, the caller is
/// already seated (creators cannot claim their own open seat), or the
/// seat was taken.
#[instrument(skip(store))]
pub async fn join_session(
    store: &Arc<dyn DocumentStore>,
    session_id: &str,
    user_id: &str,
) -> Result<(), SessionError> {
    let snapshot = store.get(session_id).await?;
    let record = snapshot.record();

    if record.mark_of(user_id).is_some() {
        warn!(session_id, user_id, "Participant is already seated");
        return Err(SessionError::AlreadySeated);
    }
    if record.seat(Mark::O).is_some() {
        warn!(session_id, user_id, "O seat is already taken");
        return Err(SessionError::SeatTaken);
    }
    if !record.status().is_waiting() {
        warn!(session_id, status = %record.status(), "Session is not joinable");
        return Err(SessionError::NotJoinable(*record.status()));
    }

    let claimed = record.claim_o_seat(user_id);
    store
        .update(session_id, *snapshot.revision(), claimed)
        .await?;

    info!(session_id, user_id, "Joined session as O, session active");
    Ok(())
}

/// Opens a handle on an existing session for the given participant.
///
/// Spectators may open handles too; they simply never hold a seat.
#[instrument(skip(store))]
pub async fn open_session(
    store: Arc<dyn DocumentStore>,
    session_id: &str,
    user_id: &str,
) -> Result<SessionHandle, SessionError> {
    let watch = store.watch(session_id).await?;
    debug!(session_id, user_id, "Session handle opened");
    Ok(SessionHandle {
        store,
        session_id: session_id.to_string(),
        user_id: user_id.to_string(),
        watch,
    })
}

/// A participant's live connection to one session.
///
/// Owns the document subscription; dropping the handle releases it and no
/// further pushes are delivered.
#[derive(Debug)]
pub struct SessionHandle {
    store: Arc<dyn DocumentStore>,
    session_id: String,
    user_id: String,
    watch: DocumentWatch,
}

impl SessionHandle {
    /// The session this handle is attached to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// View derived from the latest pushed snapshot.
    pub fn view(&self) -> Result<SessionView, SessionError> {
        let snapshot = self.watch.current();
        Ok(SessionView::derive(
            &self.session_id,
            &snapshot,
            &self.user_id,
        )?)
    }

    /// Waits for the next accepted write and returns the view it produced.
    pub async fn changed(&mut self) -> Result<SessionView, SessionError> {
        let snapshot = self.watch.changed().await?;
        Ok(SessionView::derive(
            &self.session_id,
            &snapshot,
            &self.user_id,
        )?)
    }

    /// Submits a move at the given position.
    ///
    /// Reads the current snapshot, validates the move against it, applies
    /// the rules engine, and writes the whole record back conditioned on
    /// the snapshot's revision. Returns the outcome when this move ends
    /// the game.
    ///
    /// # Errors
    ///
    /// Validation failures ([`MoveError`]) issue no write. A rejected
    /// conditional write surfaces as [`StoreError::Conflict`]; re-read
    /// (await the next push) and retry or drop the move.
    #[instrument(skip(self), fields(session_id = %self.session_id, user_id = %self.user_id))]
    pub async fn submit_move(&self, position: Position) -> Result<Option<Outcome>, SessionError> {
        let snapshot = self.store.get(&self.session_id).await?;
        let record = snapshot.record();

        let mark = record.mark_of(&self.user_id).ok_or_else(|| {
            warn!("Caller holds no seat in this session");
            SessionError::Move(MoveError::NotAPlayer)
        })?;

        let board = record.decode_board()?;
        let mov = PlayerMove::new(mark, position);
        LegalMove::check(&mov, *record.status(), *record.current_turn(), &board).map_err(|e| {
            debug!(error = %e, "Move rejected, no write issued");
            SessionError::Move(e)
        })?;

        let next_board = board.with_move(position, mark);
        let mut next = record.with_board(&next_board, mark.opponent());

        let outcome = if let Some(winner) = rules::check_winner(&next_board) {
            Some(Outcome::Winner(winner))
        } else if rules::is_full(&next_board) {
            Some(Outcome::Draw)
        } else {
            None
        };
        if let Some(outcome) = outcome {
            next = next.with_outcome(outcome);
        }

        self.store
            .update(&self.session_id, *snapshot.revision(), next)
            .await?;

        info!(%mov, outcome = ?outcome, "Move accepted");
        Ok(outcome)
    }

    /// Forfeits the game, recording the opponent as winner.
    ///
    /// Playable by either seated participant while the session is active.
    /// The write is unconditional: a forfeit concedes whatever state the
    /// board is in and cannot be invalidated by a concurrent move.
    #[instrument(skip(self), fields(session_id = %self.session_id, user_id = %self.user_id))]
    pub async fn forfeit(&self) -> Result<(), SessionError> {
        let snapshot = self.store.get(&self.session_id).await?;
        let record = snapshot.record();

        let mark = record
            .mark_of(&self.user_id)
            .ok_or(SessionError::Move(MoveError::NotAPlayer))?;
        if !record.status().is_active() {
            return Err(SessionError::Move(MoveError::NotActive(*record.status())));
        }

        let next = record.with_outcome(Outcome::Winner(mark.opponent()));
        self.store.put(&self.session_id, next).await?;

        info!(forfeited_by = %mark, "Session forfeited");
        Ok(())
    }
}

/// Errors surfaced by the session protocol.
#[derive(Debug, derive_more::Display)]
pub enum SessionError {
    /// The session record does not exist (or was deleted). Terminal; the
    /// caller shows "game not found" and does not retry.
    #[display("game not found")]
    NotFound,

    /// The caller already holds a seat in this session.
    #[display("already seated in this session")]
    AlreadySeated,

    /// The O seat is already taken.
    #[display("seat O is already taken")]
    SeatTaken,

    /// The session is past the waiting phase.
    #[display("session is not joinable (status: {})", _0)]
    NotJoinable(SessionStatus),

    /// A move failed validation; no write was issued.
    #[display("illegal move: {}", _0)]
    Move(MoveError),

    /// The stored record could not be decoded.
    #[display("corrupt session record: {}", _0)]
    Record(RecordError),

    /// The store rejected or failed the operation.
    #[display("store error: {}", _0)]
    Store(StoreError),
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Move(e) => Some(e),
            SessionError::Record(e) => Some(e),
            SessionError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        SessionError::Move(err)
    }
}

impl From<RecordError> for SessionError {
    fn from(err: RecordError) -> Self {
        SessionError::Record(err)
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            // A missing document is the terminal not-found state, not a
            // transport problem.
            StoreError::NotFound(_) => SessionError::NotFound,
            other => SessionError::Store(other),
        }
    }
}

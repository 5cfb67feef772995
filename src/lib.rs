//! Gridmatch - two-player tic-tac-toe sessions over a shared document store.
//!
//! The game record lives in a document store that pushes every accepted
//! write to its subscribers; two clients coordinate through it with no
//! authoritative process between them.
//!
//! # Architecture
//!
//! - **Game**: pure rules engine (board values, win/draw detection) plus
//!   the named preconditions a move must satisfy
//! - **Record**: the persisted session document in its wire shape
//! - **Store**: the document-store seam (get / put / conditional update /
//!   watch) and an in-process reference implementation
//! - **Session**: the protocol clients follow - create, claim the open
//!   seat, submit validated moves with an optimistic-concurrency token
//! - **Api**: read-only HTTP lookup of a session by id
//!
//! # Example
//!
//! ```no_run
//! use gridmatch::{session, DocumentStore, MemoryStore, Position};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), gridmatch::SessionError> {
//! let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
//!
//! let id = session::create_session(&store, "alice").await?;
//! session::join_session(&store, &id, "bob").await?;
//!
//! let alice = session::open_session(store.clone(), &id, "alice").await?;
//! alice.submit_move(Position::Center).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod cli;
mod config;
mod game;
mod record;
mod store;

// Session protocol is addressed as a module (free functions + handle).
pub mod session;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServeConfig};

// Crate-level exports - Game types
pub use game::{Board, Cell, Mark, MoveError, Outcome, PlayerMove, Position, SessionStatus};

// Crate-level exports - Game internals (rules and preconditions)
pub use game::{contracts, rules};

// Crate-level exports - Persisted record
pub use record::{decode_board, encode_board, GameSessionRecord, RecordError, Seats};

// Crate-level exports - Store seam
pub use store::{DocumentStore, DocumentWatch, MemoryStore, StoreError, Versioned};

// Crate-level exports - Session protocol
pub use session::{SessionError, SessionHandle, SessionView};

// Crate-level exports - Lookup API
pub use api::{router, SharedStore};

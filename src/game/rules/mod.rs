//! Game rules for tic-tac-toe.
//!
//! Pure functions for evaluating board state. Rules carry no session
//! context; they are composed with the seat/turn preconditions in
//! [`super::contracts`] by the session layer.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;

//! Gridmatch - Unified CLI
//!
//! Exhibition demo and read-only lookup server over the in-process store.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use gridmatch::session::{self, SessionHandle, SessionView};
use gridmatch::{Cli, Command, DocumentStore, MemoryStore, Position, ServeConfig};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Demo { draw } => run_demo(draw).await,
        Command::Serve { host, port, config } => run_serve(host, port, config).await,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Play a scripted game between two in-process clients sharing one store.
async fn run_demo(draw: bool) -> Result<()> {
    init_tracing();

    info!(draw, "Starting exhibition game");

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());

    let session_id = session::create_session(&store, "alice").await?;
    session::join_session(&store, &session_id, "bob").await?;

    let alice = session::open_session(store.clone(), &session_id, "alice").await?;
    let bob = session::open_session(store.clone(), &session_id, "bob").await?;

    // Row/col scripts; X plays the odd plies, O the even ones.
    let (x_moves, o_moves) = if draw {
        (
            vec![
                Position::TopLeft,
                Position::TopRight,
                Position::MiddleLeft,
                Position::BottomCenter,
                Position::BottomRight,
            ],
            vec![
                Position::Center,
                Position::TopCenter,
                Position::MiddleRight,
                Position::BottomLeft,
            ],
        )
    } else {
        (
            vec![Position::TopLeft, Position::TopCenter, Position::TopRight],
            vec![Position::Center, Position::BottomRight],
        )
    };

    let (first, second) = tokio::try_join!(drive(alice, x_moves), drive(bob, o_moves))?;

    let final_view = first
        .or(second)
        .ok_or_else(|| anyhow::anyhow!("game ended without reaching a terminal state"))?;

    match final_view.outcome() {
        Some(outcome) => println!("\nGame over: {}", outcome),
        None => println!("\nGame over"),
    }

    Ok(())
}

/// Drives one client: waits for pushes, plays its scripted moves on its
/// turn, and returns the terminal view once the session finishes.
#[instrument(skip(handle, moves), fields(session_id = %handle.session_id()))]
async fn drive(mut handle: SessionHandle, moves: Vec<Position>) -> Result<Option<SessionView>> {
    let mut moves = moves.into_iter();

    loop {
        let view = handle.view()?;
        if view.status().is_finished() {
            return Ok(Some(view));
        }

        if *view.my_turn() {
            let Some(position) = moves.next() else {
                return Ok(None);
            };
            handle.submit_move(position).await?;

            let after = handle.view()?;
            let mark = view
                .my_mark()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!("\n{} plays {}:\n{}", mark, position, after.board().display());
            continue;
        }

        handle.changed().await?;
    }
}

/// Run the read-only lookup API over a fresh store with one seeded game.
async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<std::path::PathBuf>,
) -> Result<()> {
    init_tracing();

    let config = match config_path {
        Some(path) => ServeConfig::from_file(path)?,
        None => ServeConfig::default(),
    }
    .with_overrides(host, port);

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());

    // Seed one waiting session so the endpoint has something to serve.
    let game_id = session::create_session(&store, "demo-host").await?;
    info!(game_id = %game_id, "Seeded waiting demo session");

    let app = gridmatch::router(store);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        "Server ready at http://{}:{}/api/tictactoe?id={}",
        config.host(),
        config.port(),
        game_id
    );

    axum::serve(listener, app).await?;

    Ok(())
}

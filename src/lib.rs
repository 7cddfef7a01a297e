//! slide-2048: a tick-driven 2048 game engine
//!
//! This crate provides:
//! - A `Game` board engine (`engine` module): phases, score, move resolution,
//!   spawning and win/lose detection on a fixed 4x4 grid
//! - Animation-aware `Tile`s whose merges are buffered until the move settles
//! - TOML configuration for timings, spawn odds and pixel layout (`config` module)
//! - Collaborator traits for rendering and input decoding (`frontend` module)
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{Game, GamePhase, Move};
//!
//! // Seeded RNG for a reproducible game
//! let mut game = Game::seeded(42);
//! assert!(game.start_new_game());
//!
//! // Resolve a move, then let the frontend's ticks play it out
//! game.handle_move(Move::Left);
//! while game.is_busy() {
//!     game.tick();
//! }
//! assert_eq!(game.phase(), GamePhase::Game);
//! ```
//!
//! Frontends drive the engine with ticks and decoded commands:
//! ```
//! use slide_2048::engine::{Game, GameEvent};
//! use slide_2048::frontend::{InputTranslator, KeyTranslator, Renderer, TextRenderer};
//!
//! let mut game = Game::seeded(7);
//! let mut screen = TextRenderer::new(Vec::new());
//! for line in ["", "a", "w", "d"] {
//!     if let Some(cmd) = KeyTranslator.translate(line) {
//!         game.submit(cmd);
//!     }
//!     game.settle();
//!     screen.render(game.grid(), game.phase(), game.score()).unwrap();
//! }
//! let spawned = game
//!     .drain_events()
//!     .into_iter()
//!     .filter(|e| matches!(e, GameEvent::TileSpawned { .. }))
//!     .count();
//! assert!(spawned >= 2);
//! ```
//!
pub mod config;
pub mod engine;
pub mod frontend;

//! Engine module: the 4x4 board, its tiles, and the tick-driven state machine
//! that resolves moves. Public API stays small and ergonomic.
//!
//! - `Game` is the board engine: phases, score, move resolution, spawning.
//! - `Grid` holds the 16 tile slots and answers board-wide queries.
//! - `Tile` carries a value plus the buffered outcome and motion used to keep
//!   logical state in step with a frontend's animation.
//! - Geometry and random helpers live in their own submodules.

pub mod game;
pub mod geometry;
pub mod grid;
pub mod spawn;
pub mod tile;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use game::{Command, DialogChoice, EndDialog, Game, GameEvent};
pub use geometry::{traversal_order, Cell, Layout, Point};
pub use grid::Grid;
pub use tile::{Pending, TickOutcome, Tile, TileId};

/// Number of rows on the board.
pub const BOARD_ROWS: usize = 4;
/// Number of columns on the board.
pub const BOARD_COLS: usize = 4;
/// Number of slots on the board.
pub const BOARD_SIZE: usize = BOARD_ROWS * BOARD_COLS;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in a fixed order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        };
        f.write_str(s)
    }
}

/// Phase of the game state machine. A game always starts on `Title`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Title,
    Game,
    Win,
    Lose,
}

impl GamePhase {
    /// True for the two end-of-game phases.
    #[inline]
    pub fn is_ended(self) -> bool {
        matches!(self, GamePhase::Win | GamePhase::Lose)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GamePhase::Title => "TITLE",
            GamePhase::Game => "GAME",
            GamePhase::Win => "WIN",
            GamePhase::Lose => "LOSE",
        };
        f.write_str(s)
    }
}

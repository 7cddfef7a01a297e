//! The board engine: a tick-driven state machine over `GamePhase` that owns the
//! grid, resolves moves and spawns tiles.
//!
//! A move is resolved in full the moment it is handled: tiles are reassigned to
//! their destination slots and merges are buffered on the tiles. The frontend's
//! ticks then drive the animation, commit the buffered merges, spawn the next
//! tile, and finally let the engine check for a win or a loss once the board
//! has been still for long enough.

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::geometry::{traversal_order, Cell};
use super::grid::Grid;
use super::spawn;
use super::tile::{TickOutcome, Tile, TileId};
use super::{GamePhase, Move, BOARD_SIZE};
use crate::config::Config;

/// Upper bound on the ticks `Game::settle` will run.
const SETTLE_TICK_LIMIT: u32 = 1_000;

/// Notifications raised for the frontend, drained with `Game::drain_events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    TileSpawned { cell: Cell, value: u32 },
    /// A move reached resolution; `moved` is false when nothing could shift.
    MoveResolved { direction: Move, moved: bool },
    Merged { cell: Cell, value: u32, score_delta: u64 },
    /// `final_score` is set when entering `Win` or `Lose`.
    PhaseChanged { from: GamePhase, to: GamePhase, final_score: Option<u64> },
}

/// An answer to the end-of-game dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogChoice {
    KeepGoing,
    BackToTitle,
}

const WIN_CHOICES: &[DialogChoice] = &[DialogChoice::KeepGoing, DialogChoice::BackToTitle];
const LOSE_CHOICES: &[DialogChoice] = &[DialogChoice::BackToTitle];

/// Summary shown when a game ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndDialog {
    pub won: bool,
    pub score: u64,
    pub choices: &'static [DialogChoice],
}

/// Logical input, already decoded from whatever device the frontend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Move(Move),
    Start,
    Continue,
    NewGame,
    Back,
    /// Never consumed by the engine; frontends use it to leave their loop.
    Quit,
}

/// The board engine.
///
/// Randomness is injected so seeded games are reproducible:
/// ```
/// use slide_2048::engine::{Game, GamePhase, Move};
/// let mut game = Game::seeded(42);
/// assert_eq!(game.phase(), GamePhase::Title);
/// assert!(game.start_new_game());
/// assert_eq!(game.grid().unwrap().tiles().count(), 2);
/// game.handle_move(Move::Left);
/// game.settle();
/// assert_eq!(game.phase(), GamePhase::Game);
/// ```
#[derive(Debug, Clone)]
pub struct Game<R: Rng = StdRng> {
    config: Config,
    rng: R,
    phase: GamePhase,
    grid: Option<Grid>,
    vanishing: Vec<Tile>,
    score: u64,
    movement_counter: u32,
    idle_ticks: u32,
    continue_mode: bool,
    next_id: u64,
    events: Vec<GameEvent>,
}

impl Game<StdRng> {
    /// Default configuration with a seeded `StdRng`.
    pub fn seeded(seed: u64) -> Self {
        Game::new(Config::default(), StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    /// A game on the title screen.
    pub fn new(config: Config, rng: R) -> Self {
        Game {
            config,
            rng,
            phase: GamePhase::Title,
            grid: None,
            vanishing: Vec::new(),
            score: 0,
            movement_counter: 0,
            idle_ticks: 0,
            continue_mode: false,
            next_id: 0,
            events: Vec::new(),
        }
    }

    /// A game already in progress on the given board (row-major, 0 = empty).
    ///
    /// Panics if a value is neither 0 nor a power of two of at least 2.
    pub fn from_values(config: Config, rng: R, values: [u32; BOARD_SIZE]) -> Self {
        let mut game = Game::new(config, rng);
        let mut grid = Grid::new();
        for (idx, &value) in values.iter().enumerate() {
            if value == 0 {
                continue;
            }
            assert!(value >= 2 && value.is_power_of_two(), "bad tile value {value}");
            let tile = game.make_tile(value, Cell::from_index(idx));
            grid.place(tile);
        }
        game.grid = Some(grid);
        game.phase = GamePhase::Game;
        game
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// True once the player has chosen to keep going past a win.
    #[inline]
    pub fn continue_mode(&self) -> bool {
        self.continue_mode
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The board, absent on the title screen.
    #[inline]
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Tile occupying `cell`, if any.
    #[inline]
    pub fn tile(&self, cell: Cell) -> Option<&Tile> {
        self.grid.as_ref().and_then(|g| g.get(cell))
    }

    /// Tile occupying slot `idx`; `None` for empty or out-of-range slots.
    #[inline]
    pub fn tile_at(&self, idx: usize) -> Option<&Tile> {
        self.grid.as_ref().and_then(|g| g.get_index(idx))
    }

    /// Tiles absorbed by a merge that are still shown until their removal elapses.
    #[inline]
    pub fn vanishing(&self) -> &[Tile] {
        &self.vanishing
    }

    /// Ticks left before the current move's spawn.
    #[inline]
    pub fn move_countdown(&self) -> u32 {
        self.movement_counter
    }

    /// True while a move is still settling; new moves are rejected meanwhile.
    pub fn is_busy(&self) -> bool {
        self.movement_counter > 0
            || !self.vanishing.is_empty()
            || self.grid.as_ref().is_some_and(Grid::any_active)
    }

    /// Events raised since the last drain, oldest first.
    #[inline]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The end-of-game summary while in `Win` or `Lose`.
    pub fn dialog(&self) -> Option<EndDialog> {
        match self.phase {
            GamePhase::Win => Some(EndDialog { won: true, score: self.score, choices: WIN_CHOICES }),
            GamePhase::Lose => Some(EndDialog { won: false, score: self.score, choices: LOSE_CHOICES }),
            GamePhase::Title | GamePhase::Game => None,
        }
    }

    /// Begin a fresh game. Only applies when no board exists.
    pub fn start_new_game(&mut self) -> bool {
        if self.grid.is_some() {
            debug!("start ignored: a board already exists");
            return false;
        }
        self.set_phase(GamePhase::Game);
        true
    }

    /// Force a phase and load what it needs: `Title` drops the board, `Game`
    /// creates one only if none exists, `Win`/`Lose` keep the board for the summary.
    pub fn set_phase(&mut self, phase: GamePhase) {
        let from = self.phase;
        self.phase = phase;
        self.idle_ticks = 0;
        let final_score = phase.is_ended().then_some(self.score);
        info!("phase {from} -> {phase} (score {})", self.score);
        self.events.push(GameEvent::PhaseChanged { from, to: phase, final_score });

        match phase {
            GamePhase::Title => {
                self.grid = None;
                self.vanishing.clear();
                self.movement_counter = 0;
            }
            GamePhase::Game => {
                if self.grid.is_none() {
                    self.new_board();
                }
            }
            GamePhase::Win | GamePhase::Lose => {}
        }
    }

    /// Keep playing after a win. Later tiles of the win value no longer end the game.
    pub fn choose_continue(&mut self) -> bool {
        if self.phase != GamePhase::Win {
            debug!("continue ignored in phase {}", self.phase);
            return false;
        }
        self.continue_mode = true;
        self.set_phase(GamePhase::Game);
        true
    }

    /// Leave a finished game for the title screen.
    pub fn choose_new_game(&mut self) -> bool {
        if !self.phase.is_ended() {
            debug!("new game ignored in phase {}", self.phase);
            return false;
        }
        self.set_phase(GamePhase::Title);
        true
    }

    /// Apply a dialog answer. Choices the current dialog does not offer are rejected.
    pub fn resolve_dialog(&mut self, choice: DialogChoice) -> bool {
        match self.dialog() {
            Some(dialog) if dialog.choices.contains(&choice) => {}
            _ => return false,
        }
        match choice {
            DialogChoice::KeepGoing => self.choose_continue(),
            DialogChoice::BackToTitle => self.choose_new_game(),
        }
    }

    /// Route a decoded command. Returns whether it had any effect.
    pub fn submit(&mut self, command: Command) -> bool {
        match (self.phase, command) {
            (_, Command::Quit) => false,
            (GamePhase::Title, Command::Move(_) | Command::Start) => self.start_new_game(),
            (GamePhase::Game, Command::Move(dir)) => self.handle_move(dir),
            (GamePhase::Win, Command::Continue) => self.resolve_dialog(DialogChoice::KeepGoing),
            (GamePhase::Win | GamePhase::Lose, Command::NewGame | Command::Back) => {
                self.resolve_dialog(DialogChoice::BackToTitle)
            }
            (phase, command) => {
                debug!("{command:?} ignored in phase {phase}");
                false
            }
        }
    }

    /// Slide every tile toward `dir`, merging equal neighbours once each.
    ///
    /// Ignored outside `Game` and while a previous move is settling. Returns
    /// whether any tile shifted or merged.
    pub fn handle_move(&mut self, dir: Move) -> bool {
        if self.phase != GamePhase::Game {
            debug!("move {dir} ignored in phase {}", self.phase);
            return false;
        }
        if self.is_busy() {
            debug!("move {dir} ignored: board still settling");
            return false;
        }
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let layout = self.config.layout;

        let mut moved = false;
        for idx in traversal_order(dir) {
            let Some(mut tile) = grid.take(Cell::from_index(idx)) else {
                continue;
            };
            let mut cell = tile.cell();
            let mut absorbed = None;
            while let Some(next) = cell.step(dir) {
                // None: free cell. Some(true): blocked. Some(false): merge partner.
                let blocked = grid.get(next).map(|other| {
                    other.has_pending_outcome()
                        || tile.has_pending_outcome()
                        || other.value() != tile.value()
                });
                match blocked {
                    None => {
                        cell = next;
                        moved = true;
                    }
                    Some(true) => break,
                    Some(false) => {
                        absorbed = grid.take(next);
                        cell = next;
                        moved = true;
                        break;
                    }
                }
            }

            if let Some(mut partner) = absorbed {
                let value = tile.value() + partner.value();
                tile.buffer_merge(value);
                partner.buffer_removal();
                self.vanishing.push(partner);
                self.score += u64::from(value);
                debug!("merge -> {value} at {cell}");
                self.events.push(GameEvent::Merged { cell, value, score_delta: u64::from(value) });
            }
            tile.set_target(cell, &layout);
            grid.place(tile);
        }

        if moved {
            self.movement_counter = self.config.timing.movement_frames;
            self.idle_ticks = 0;
        }
        self.events.push(GameEvent::MoveResolved { direction: dir, moved });
        moved
    }

    /// Advance one frame: animate tiles, apply elapsed buffers, spawn after a
    /// move, and evaluate win/lose once the board has been still long enough.
    pub fn tick(&mut self) {
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        for tile in grid.tiles_mut() {
            if let TickOutcome::Committed(value) = tile.tick() {
                trace!("tile {:?} committed {value} at {}", tile.id(), tile.cell());
            }
        }
        self.vanishing.retain_mut(|t| t.tick() != TickOutcome::Removed);

        if self.movement_counter > 0 {
            self.movement_counter -= 1;
            if self.movement_counter == 0 {
                self.spawn_random_tile();
            }
        }

        if self.phase != GamePhase::Game {
            return;
        }
        if self.is_busy() {
            self.idle_ticks = 0;
            return;
        }
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks > self.config.timing.end_check_delay {
            self.check_end();
        }
    }

    /// Tick until nothing is moving and the end check has had its chance to run.
    /// Returns the number of ticks spent.
    pub fn settle(&mut self) -> u32 {
        let mut ticks = 0;
        while ticks < SETTLE_TICK_LIMIT {
            self.tick();
            ticks += 1;
            if self.is_busy() {
                continue;
            }
            if self.phase != GamePhase::Game
                || self.idle_ticks > self.config.timing.end_check_delay
            {
                break;
            }
        }
        ticks
    }

    fn check_end(&mut self) {
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        let won = !self.continue_mode && grid.contains_value(self.config.rules.win_value);
        let lost = grid.is_full() && !grid.has_adjacent_match();
        if won {
            self.set_phase(GamePhase::Win);
        } else if lost {
            self.set_phase(GamePhase::Lose);
        }
    }

    fn new_board(&mut self) {
        self.grid = Some(Grid::new());
        self.vanishing.clear();
        self.score = 0;
        self.continue_mode = false;
        self.movement_counter = 0;
        for _ in 0..self.config.spawn.initial_tiles {
            self.spawn_random_tile();
        }
        info!("new board dealt");
    }

    /// Place a starting-value tile on a uniformly chosen empty slot.
    /// No-op on a full board.
    fn spawn_random_tile(&mut self) -> Option<Cell> {
        let empty = self.grid.as_ref()?.empty_cells();
        let Some(cell) = spawn::pick_empty(&mut self.rng, &empty) else {
            debug!("board full, nothing spawned");
            return None;
        };
        let value = spawn::starting_value(&mut self.rng, self.config.spawn.four_probability);
        let tile = self.make_tile(value, cell);
        self.grid.as_mut()?.place(tile);
        debug!("spawned {value} at {cell}");
        self.events.push(GameEvent::TileSpawned { cell, value });
        Some(cell)
    }

    fn make_tile(&mut self, value: u32, cell: Cell) -> Tile {
        let id = TileId(self.next_id);
        self.next_id += 1;
        Tile::new(id, value, cell, &self.config.layout, self.config.timing.movement_frames)
    }
}

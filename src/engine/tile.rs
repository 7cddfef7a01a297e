use serde::{Deserialize, Serialize};

use super::geometry::{Cell, Layout, Point};

/// Stable identity of a tile for the lifetime of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u64);

/// Buffered outcome of a merge, applied once the settle countdown elapses.
///
/// A tile with anything other than `Idle` is "in limbo": it has already been
/// accounted for logically and may not take part in another merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pending {
    #[default]
    Idle,
    /// The tile becomes this value.
    Merge(u32),
    /// The tile disappears.
    Removal,
}

/// What happened to a tile's buffered outcome during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Unchanged,
    /// A buffered merge was committed; the tile now holds this value.
    Committed(u32),
    /// A buffered removal elapsed; the owner must drop the tile.
    Removed,
}

/// A numbered tile: its value, its logical cell, and the motion and buffered
/// outcome a frontend needs to animate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    value: u32,
    cell: Cell,
    position: Point,
    target_x: Option<i32>,
    target_y: Option<i32>,
    rate: Point,
    pending: Pending,
    countdown: u32,
    frames: u32,
}

impl Tile {
    /// A resting tile at `cell`. `frames` is the settle length used for both
    /// motion and buffered outcomes.
    pub fn new(id: TileId, value: u32, cell: Cell, layout: &Layout, frames: u32) -> Self {
        debug_assert!(value.is_power_of_two() && value >= 2);
        Tile {
            id,
            value,
            cell,
            position: layout.origin(cell),
            target_x: None,
            target_y: None,
            rate: Point::default(),
            pending: Pending::Idle,
            countdown: 0,
            frames: frames.max(1),
        }
    }

    #[inline]
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Value currently shown on the tile.
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Value the tile will hold once its buffered outcome is applied.
    /// Tiles pending removal count as zero.
    #[inline]
    pub fn settled_value(&self) -> u32 {
        match self.pending {
            Pending::Idle => self.value,
            Pending::Merge(v) => v,
            Pending::Removal => 0,
        }
    }

    /// Logical cell the tile occupies (or, for a vanishing tile, last occupied).
    #[inline]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Current animated pixel position.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Pixel destination; equals `position` on any axis without a target.
    #[inline]
    pub fn target(&self) -> Point {
        Point::new(
            self.target_x.unwrap_or(self.position.x),
            self.target_y.unwrap_or(self.position.y),
        )
    }

    /// Per-tick displacement currently applied.
    #[inline]
    pub fn rate(&self) -> Point {
        self.rate
    }

    #[inline]
    pub fn pending(&self) -> Pending {
        self.pending
    }

    /// True while the tile has an unreached target or a non-zero rate.
    #[inline]
    pub fn is_in_motion(&self) -> bool {
        self.target_x.is_some() || self.target_y.is_some() || self.rate != Point::default()
    }

    /// True while a buffered merge or removal has not been applied yet.
    #[inline]
    pub fn has_pending_outcome(&self) -> bool {
        self.pending != Pending::Idle
    }

    /// Relocate the tile to `cell` and aim its animation there. Only axes that
    /// differ from the current pixel position get a target.
    pub fn set_target(&mut self, cell: Cell, layout: &Layout) {
        self.cell = cell;
        let dest = layout.origin(cell);
        if dest.x != self.position.x {
            self.target_x = Some(dest.x);
        }
        if dest.y != self.position.y {
            self.target_y = Some(dest.y);
        }
    }

    /// Arm a merge: the tile takes `value` when the countdown elapses.
    pub fn buffer_merge(&mut self, value: u32) {
        self.pending = Pending::Merge(value);
        self.countdown = self.frames;
    }

    /// Arm a removal: the tile vanishes when the countdown elapses.
    pub fn buffer_removal(&mut self) {
        self.pending = Pending::Removal;
        self.countdown = self.frames;
    }

    /// Advance motion and the buffer countdown by one frame.
    pub fn tick(&mut self) -> TickOutcome {
        // Clear reached targets before stepping.
        if self.target_x == Some(self.position.x) {
            self.target_x = None;
            self.rate.x = 0;
        }
        if self.target_y == Some(self.position.y) {
            self.target_y = None;
            self.rate.y = 0;
        }

        // Never overshoot.
        if let Some(tx) = self.target_x {
            self.rate.x = clamp_rate(self.rate.x, tx - self.position.x);
        }
        if let Some(ty) = self.target_y {
            self.rate.y = clamp_rate(self.rate.y, ty - self.position.y);
        }

        self.position.x += self.rate.x;
        self.position.y += self.rate.y;

        if let Some(tx) = self.target_x {
            if self.rate.x == 0 {
                self.rate.x = derive_rate(tx - self.position.x, self.frames);
            }
        }
        if let Some(ty) = self.target_y {
            if self.rate.y == 0 {
                self.rate.y = derive_rate(ty - self.position.y, self.frames);
            }
        }

        if self.countdown > 0 {
            self.countdown -= 1;
            if self.countdown == 0 {
                return self.apply_pending();
            }
        }
        TickOutcome::Unchanged
    }

    fn apply_pending(&mut self) -> TickOutcome {
        match self.pending {
            Pending::Idle => TickOutcome::Unchanged,
            Pending::Merge(v) => {
                self.value = v;
                self.pending = Pending::Idle;
                TickOutcome::Committed(v)
            }
            Pending::Removal => TickOutcome::Removed,
        }
    }
}

#[inline]
fn clamp_rate(rate: i32, distance: i32) -> i32 {
    if rate.abs() > distance.abs() {
        distance
    } else {
        rate
    }
}

// At least one pixel per frame so short distances still converge.
#[inline]
fn derive_rate(distance: i32, frames: u32) -> i32 {
    let rate = distance / frames as i32;
    if rate == 0 {
        distance.signum()
    } else {
        rate
    }
}

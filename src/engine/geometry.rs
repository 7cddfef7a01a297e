use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Move, BOARD_COLS, BOARD_ROWS, BOARD_SIZE};

/// A logical board position. Always in range; constructors assert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    row: usize,
    col: usize,
}

impl Cell {
    /// Construct a cell from row and column.
    ///
    /// Panics if either coordinate is off the board.
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        assert!(row < BOARD_ROWS && col < BOARD_COLS, "cell ({row},{col}) off board");
        Cell { row, col }
    }

    /// Construct a cell from its row-major slot index (0..16).
    ///
    /// Panics if the index is off the board.
    #[inline]
    pub fn from_index(idx: usize) -> Self {
        assert!(idx < BOARD_SIZE, "slot index {idx} off board");
        Cell { row: idx / BOARD_COLS, col: idx % BOARD_COLS }
    }

    /// Checked variant of `new` for untrusted coordinates.
    #[inline]
    pub fn try_new(row: usize, col: usize) -> Option<Self> {
        (row < BOARD_ROWS && col < BOARD_COLS).then_some(Cell { row, col })
    }

    #[inline]
    pub fn row(self) -> usize {
        self.row
    }

    #[inline]
    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.row * BOARD_COLS + self.col
    }

    /// The neighbouring cell one step toward `dir`, or `None` at the wall.
    #[inline]
    pub fn step(self, dir: Move) -> Option<Cell> {
        let (row, col) = (self.row, self.col);
        match dir {
            Move::Up => row.checked_sub(1).map(|r| Cell { row: r, col }),
            Move::Down => Cell::try_new(row + 1, col),
            Move::Left => col.checked_sub(1).map(|c| Cell { row, col: c }),
            Move::Right => Cell::try_new(row, col + 1),
        }
    }

    /// Iterate every cell in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BOARD_SIZE).map(Cell::from_index)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Slot visitation order for a move: tiles nearest the destination wall first,
/// so a tile that has already merged blocks the tiles behind it.
///
/// ```
/// use slide_2048::engine::{traversal_order, Move};
/// assert_eq!(traversal_order(Move::Up)[..4], [0, 1, 2, 3]);
/// assert_eq!(traversal_order(Move::Left)[..4], [0, 4, 8, 12]);
/// ```
pub fn traversal_order(dir: Move) -> [usize; BOARD_SIZE] {
    let mut order = [0usize; BOARD_SIZE];
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = match dir {
            Move::Up => i,
            Move::Down => BOARD_SIZE - 1 - i,
            // Column-major, leftmost column first.
            Move::Left => (i % BOARD_ROWS) * BOARD_COLS + i / BOARD_ROWS,
            Move::Right => (i % BOARD_ROWS) * BOARD_COLS + (BOARD_COLS - 1 - i / BOARD_ROWS),
        };
    }
    order
}

/// A frontend pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Mapping from logical cells to the pixel grid a frontend draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Pixel coordinate of cell (0,0) on both axes.
    pub top_left: i32,
    /// Distance between the origins of adjacent cells.
    pub tile_offset: i32,
    /// Edge length of a drawn tile.
    pub tile_size: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Layout { top_left: 9, tile_offset: 28, tile_size: 25 }
    }
}

impl Layout {
    /// Pixel coordinate of a row or column index.
    #[inline]
    pub fn pixel(&self, line_idx: usize) -> i32 {
        line_idx as i32 * self.tile_offset + self.top_left
    }

    /// Top-left pixel of a cell.
    #[inline]
    pub fn origin(&self, cell: Cell) -> Point {
        Point::new(self.pixel(cell.col()), self.pixel(cell.row()))
    }

    /// Width (and height) of the square board, including the margins.
    #[inline]
    pub fn board_extent(&self) -> i32 {
        2 * self.top_left + (BOARD_COLS as i32 - 1) * self.tile_offset + self.tile_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_round_trips_index() {
        for idx in 0..BOARD_SIZE {
            assert_eq!(Cell::from_index(idx).index(), idx);
        }
        assert_eq!(Cell::new(2, 3).index(), 11);
    }

    #[test]
    #[should_panic]
    fn it_rejects_off_board_cell() {
        let _ = Cell::new(4, 0);
    }

    #[test]
    fn it_steps_to_walls() {
        let corner = Cell::new(0, 0);
        assert_eq!(corner.step(Move::Up), None);
        assert_eq!(corner.step(Move::Left), None);
        assert_eq!(corner.step(Move::Down), Some(Cell::new(1, 0)));
        assert_eq!(corner.step(Move::Right), Some(Cell::new(0, 1)));
        let far = Cell::new(3, 3);
        assert_eq!(far.step(Move::Down), None);
        assert_eq!(far.step(Move::Right), None);
    }

    #[test]
    fn it_orders_nearest_wall_first() {
        assert_eq!(traversal_order(Move::Down)[..4], [15, 14, 13, 12]);
        assert_eq!(traversal_order(Move::Right)[..4], [3, 7, 11, 15]);
        assert_eq!(traversal_order(Move::Right)[12..], [0, 4, 8, 12]);
        for dir in Move::ALL {
            let mut seen = traversal_order(dir).to_vec();
            seen.sort_unstable();
            assert_eq!(seen, (0..BOARD_SIZE).collect::<Vec<_>>());
        }
    }

    #[test]
    fn it_maps_cells_to_pixels() {
        let layout = Layout::default();
        assert_eq!(layout.origin(Cell::new(0, 0)), Point::new(9, 9));
        assert_eq!(layout.origin(Cell::new(1, 3)), Point::new(93, 37));
        assert_eq!(layout.board_extent(), 127);
    }
}

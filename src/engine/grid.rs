use std::fmt;

use super::geometry::Cell;
use super::tile::Tile;
use super::BOARD_SIZE;

/// The 16 tile slots of a board, row-major.
///
/// A `Grid` only stores tiles; the rules that move them live on `Game`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    slots: [Option<Tile>; BOARD_SIZE],
}

impl Grid {
    /// An empty grid.
    pub fn new() -> Self {
        Grid::default()
    }

    /// Tile at `cell`, if any.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        self.slots[cell.index()].as_ref()
    }

    /// Tile at a slot index. Out-of-range indices yield `None`.
    #[inline]
    pub fn get_index(&self, idx: usize) -> Option<&Tile> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn take(&mut self, cell: Cell) -> Option<Tile> {
        self.slots[cell.index()].take()
    }

    /// Place `tile` at its own cell. The slot must be empty.
    #[inline]
    pub(crate) fn place(&mut self, tile: Tile) {
        let slot = &mut self.slots[tile.cell().index()];
        debug_assert!(slot.is_none(), "slot {} already occupied", tile.cell());
        *slot = Some(tile);
    }

    pub(crate) fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.slots.iter_mut().flatten()
    }

    /// Occupied slots in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().flatten()
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        Cell::all().filter(|&c| self.get(c).is_none()).collect()
    }

    /// Count the number of empty slots.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// True when every slot holds a tile.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// True if any tile is animating or has a buffered outcome.
    pub fn any_active(&self) -> bool {
        self.tiles().any(|t| t.is_in_motion() || t.has_pending_outcome())
    }

    /// True if any tile currently shows `value`.
    pub fn contains_value(&self, value: u32) -> bool {
        self.tiles().any(|t| t.value() == value)
    }

    /// Highest value shown on the board (0 when empty).
    pub fn highest_value(&self) -> u32 {
        self.tiles().map(Tile::value).max().unwrap_or(0)
    }

    /// True if any horizontally or vertically adjacent pair shows equal values.
    ///
    /// Each cell is paired with its right and lower neighbour only, so every
    /// one of the 24 adjacent pairs is checked exactly once.
    pub fn has_adjacent_match(&self) -> bool {
        use super::Move;
        Cell::all().any(|cell| {
            let Some(a) = self.get(cell) else { return false };
            [Move::Right, Move::Down]
                .into_iter()
                .filter_map(|dir| cell.step(dir))
                .filter_map(|n| self.get(n))
                .any(|b| a.value() == b.value())
        })
    }

    /// Shown values in row-major order, 0 for empty.
    pub fn values(&self) -> [u32; BOARD_SIZE] {
        std::array::from_fn(|i| self.slots[i].as_ref().map_or(0, Tile::value))
    }

    /// Values once every buffered merge has been applied, 0 for empty.
    pub fn settled_values(&self) -> [u32; BOARD_SIZE] {
        std::array::from_fn(|i| self.slots[i].as_ref().map_or(0, Tile::settled_value))
    }

    /// Sum of settled values; conserved by every move.
    pub fn settled_total(&self) -> u64 {
        self.settled_values().iter().map(|&v| v as u64).sum()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.values().iter().map(|&v| format_val(v)).collect();
        for (row, line) in cells.chunks(super::BOARD_COLS).enumerate() {
            if row > 0 {
                writeln!(f, "-------------------------------")?;
            }
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: u32) -> String {
    match val {
        0 => String::from("       "),
        x => {
            let mut x = x.to_string();
            while x.len() < 7 {
                match x.len() {
                    6 => x = format!(" {}", x),
                    _ => x = format!(" {} ", x),
                }
            }
            x
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::Layout;
    use crate::engine::tile::TileId;

    fn grid_of(values: [u32; BOARD_SIZE]) -> Grid {
        let layout = Layout::default();
        let mut grid = Grid::new();
        for (i, &v) in values.iter().enumerate() {
            if v != 0 {
                grid.place(Tile::new(TileId(i as u64), v, Cell::from_index(i), &layout, 4));
            }
        }
        grid
    }

    #[test]
    fn it_counts_empty() {
        let grid = grid_of([2, 2, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 8]);
        assert_eq!(grid.count_empty(), 12);
        assert_eq!(grid.empty_cells().len(), 12);
        assert!(!grid.is_full());
        assert_eq!(grid.highest_value(), 8);
        assert_eq!(Grid::new().highest_value(), 0);
    }

    #[test]
    fn it_finds_no_match_on_checkerboard() {
        let grid = grid_of([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert!(grid.is_full());
        assert!(!grid.has_adjacent_match());
    }

    #[test]
    fn it_finds_horizontal_and_vertical_matches() {
        let mut values = [2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2];
        // last column, vertical pair
        values[11] = 2;
        values[15] = 2;
        assert!(grid_of(values).has_adjacent_match());

        let mut values = [2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2];
        // bottom row, horizontal pair
        values[14] = 2;
        assert!(grid_of(values).has_adjacent_match());
    }

    #[test]
    fn it_ignores_matches_across_row_wrap() {
        // 8 at (0,3) and (1,0) share an index neighbour but are not adjacent.
        let grid = grid_of([2, 4, 2, 8, 8, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert!(!grid.has_adjacent_match());
    }

    #[test]
    fn it_reports_out_of_range_index_as_empty() {
        let grid = grid_of([2; BOARD_SIZE]);
        assert!(grid.get_index(15).is_some());
        assert!(grid.get_index(16).is_none());
    }

    #[test]
    fn it_renders_rows() {
        let grid = grid_of([2048, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
        let text = grid.to_string();
        assert_eq!(text.lines().count(), 7);
        assert!(text.lines().next().unwrap().starts_with("  2048 |"));
        assert!(text.lines().last().unwrap().ends_with("|   2   "));
    }
}

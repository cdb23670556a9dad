use crate::CoordInt;

/// A board position. Coordinates are 1-indexed; a freshly offset head may
/// briefly sit at 0 or `size + 1` until it is wrapped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: CoordInt,
    pub y: CoordInt,
}

impl Cell {
    pub const fn new(x: CoordInt, y: CoordInt) -> Self {
        Cell { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: CoordInt,
}

impl Grid {
    pub const fn new(size: CoordInt) -> Self {
        Grid { size }
    }

    pub fn size(&self) -> CoordInt {
        self.size
    }

    /// Brings a single coordinate back into `[1, size]`.
    pub fn wrap(&self, coord: CoordInt) -> CoordInt {
        (coord - 1).rem_euclid(self.size) + 1
    }

    pub fn wrap_cell(&self, cell: Cell) -> Cell {
        Cell::new(self.wrap(cell.x), self.wrap(cell.y))
    }

    #[cfg(test)]
    pub fn contains(&self, cell: Cell) -> bool {
        (1..=self.size).contains(&cell.x) && (1..=self.size).contains(&cell.y)
    }

    pub fn is_border(&self, cell: Cell) -> bool {
        cell.x == 1 || cell.x == self.size || cell.y == 1 || cell.y == self.size
    }

    /// Every cell off the border ring, row by row.
    pub fn interior_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (2..self.size).flat_map(move |y| (2..self.size).map(move |x| Cell::new(x, y)))
    }

    /// Where a new snake is born: (10, 10) on the standard 20x20 board.
    pub fn center(&self) -> Cell {
        Cell::new(self.size / 2, self.size / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: Grid = Grid::new(20);

    #[test]
    fn wrap_keeps_in_range_coords() {
        for c in 1..=20 {
            assert_eq!(GRID.wrap(c), c);
        }
    }

    #[test]
    fn wrap_moves_out_of_range_coords_to_opposite_edge() {
        assert_eq!(GRID.wrap(0), 20);
        assert_eq!(GRID.wrap(21), 1);
        assert_eq!(GRID.wrap(-1), 19);
        assert_eq!(GRID.wrap_cell(Cell::new(0, 21)), Cell::new(20, 1));
    }

    #[test]
    fn border_ring() {
        assert!(GRID.is_border(Cell::new(1, 5)));
        assert!(GRID.is_border(Cell::new(20, 5)));
        assert!(GRID.is_border(Cell::new(5, 1)));
        assert!(GRID.is_border(Cell::new(5, 20)));
        assert!(!GRID.is_border(Cell::new(2, 19)));
    }

    #[test]
    fn interior_excludes_border() {
        let cells: Vec<Cell> = GRID.interior_cells().collect();
        assert_eq!(cells.len(), 18 * 18);
        assert!(cells.iter().all(|c| GRID.contains(*c) && !GRID.is_border(*c)));
    }

    #[test]
    fn center_of_standard_board() {
        assert_eq!(GRID.center(), Cell::new(10, 10));
    }
}

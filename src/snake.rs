use std::collections::VecDeque;

use crate::grid::{Cell, Grid};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    fn offset(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Body segments, head first. Never empty.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn new(head: Cell) -> Self {
        Snake { body: VecDeque::from(vec![head]) }
    }

    /// Builds a snake from explicit segments, head first. Returns `None` for an
    /// empty body.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Snake { body })
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    /// The cell the head would step onto, before any wraparound.
    pub fn next_head(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.offset();
        let head = self.head();
        Cell::new(head.x + dx, head.y + dy)
    }

    /// Moves one cell in `direction`. Grows by one when `ate_food`, otherwise
    /// the tail is dropped. Only the new head is wrapped onto the board.
    pub fn advance(&mut self, direction: Direction, ate_food: bool, grid: &Grid) {
        let new_head = self.next_head(direction);
        self.body.push_front(new_head);

        if !ate_food {
            self.body.pop_back();
        }

        self.body[0] = grid.wrap_cell(new_head);
    }
}

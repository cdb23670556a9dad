use rand::{seq::SliceRandom, Rng};

use crate::grid::{Cell, Grid};
use crate::snake::Snake;

/// Picks a cell off the border ring and off the snake, uniformly among those
/// left. `None` means the board is full.
pub fn place<R: Rng + ?Sized>(grid: &Grid, snake: &Snake, rng: &mut R) -> Option<Cell> {
    let choices: Vec<Cell> = grid.interior_cells().filter(|cell| !snake.contains(cell)).collect();
    choices.choose(rng).copied()
}

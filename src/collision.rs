use crate::snake::Snake;

/// True when the head shares a cell with any other segment.
pub fn self_collision(snake: &Snake) -> bool {
    let head = snake.head();
    snake.body().iter().skip(1).any(|segment| *segment == head)
}

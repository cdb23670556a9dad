use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::Rng;

use crate::collision::self_collision;
use crate::food;
use crate::grid::{Cell, Grid};
use crate::snake::{Direction, Snake};
use crate::speed::{self, INITIAL_INTERVAL_MS};
use crate::ticker::Ticker;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Running,
}

/// What the input side can ask of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Activate,
    Direction(Direction),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundResult {
    /// The head ran into the body.
    Collision,
    /// No free cell was left for food.
    BoardFull,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverReport {
    pub result: RoundResult,
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
}

impl GameOverReport {
    pub fn lines(&self) -> Vec<String> {
        let title = match self.result {
            RoundResult::Collision => "Game Over!",
            RoundResult::BoardFull => "You won!",
        };

        vec![
            title.to_string(),
            String::new(),
            format!("Your Score: {}", self.score),
            format!("Highest Score: {}", self.high_score),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is idle; nothing moved.
    Skipped,
    Moved,
    Ate,
    RoundOver(GameOverReport),
}

/// Everything the renderer needs for one repaint.
pub struct Frame<'a> {
    pub snake: &'a VecDeque<Cell>,
    pub food: Option<Cell>,
    pub score: String,
    /// Hidden until the first round of the session ends.
    pub high_score: Option<String>,
    pub status: GameStatus,
}

pub fn format_score(score: u32) -> String {
    format!("{:03}", score)
}

pub struct GameLoop<R: Rng> {
    grid: Grid,
    snake: Snake,
    food: Option<Cell>,
    direction: Direction,
    interval_ms: u64,
    ticker: Ticker,
    status: GameStatus,
    high_score: u32,
    rounds_played: u32,
    rng: R,
}

impl<R: Rng> GameLoop<R> {
    pub fn new(grid: Grid, mut rng: R) -> Self {
        let snake = Snake::new(grid.center());
        let food = food::place(&grid, &snake, &mut rng);

        GameLoop {
            grid,
            snake,
            food,
            direction: Direction::Right,
            interval_ms: INITIAL_INTERVAL_MS,
            ticker: Ticker::new(Duration::from_millis(INITIAL_INTERVAL_MS)),
            status: GameStatus::Idle,
            high_score: 0,
            rounds_played: 0,
            rng,
        }
    }

    /// Replaces the snake and food of the pending round, e.g. to replay a
    /// recorded position.
    pub fn with_position(mut self, snake: Snake, food: Option<Cell>) -> Self {
        self.snake = snake;
        self.food = food;
        self
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn score(&self) -> u32 {
        self.snake.len() as u32 - 1
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn handle(&mut self, command: Command, now: Instant) {
        match command {
            Command::Activate => {
                self.start(now);
            }
            Command::Direction(dir) => self.set_direction(dir),
        }
    }

    /// Begins a round. Returns false, and changes nothing, if one is already
    /// running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.status == GameStatus::Running {
            return false;
        }

        self.status = GameStatus::Running;
        self.ticker.start(now);
        info!("Round {} started", self.rounds_played + 1);
        true
    }

    /// Takes effect on the next tick. Turning back into the neck is allowed.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            trace!("Direction {:?} -> {:?}", self.direction, direction);
        }
        self.direction = direction;
    }

    /// Runs a tick if one is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.ticker.poll(now) {
            Some(self.tick())
        } else {
            None
        }
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_due(now)
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Skipped;
        }

        let ate = self.food == Some(self.snake.next_head(self.direction));
        self.snake.advance(self.direction, ate, &self.grid);

        if ate {
            self.interval_ms = speed::on_food_eaten(self.interval_ms);
            self.ticker.set_interval(Duration::from_millis(self.interval_ms));
            self.food = food::place(&self.grid, &self.snake, &mut self.rng);
            debug!("Food eaten, score {} interval {}ms", self.score(), self.interval_ms);

            if self.food.is_none() {
                info!("Board full");
                return TickOutcome::RoundOver(self.reset(RoundResult::BoardFull));
            }
            return TickOutcome::Ate;
        }

        if self_collision(&self.snake) {
            return TickOutcome::RoundOver(self.reset(RoundResult::Collision));
        }

        TickOutcome::Moved
    }

    /// Ends the current round and prepares a fresh one in the idle state.
    pub fn reset(&mut self, result: RoundResult) -> GameOverReport {
        let score = self.score();
        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
            info!("New high score {}", score);
        }

        self.ticker.cancel();
        self.rounds_played += 1;
        info!("Round over ({:?}): score {} high score {}", result, score, self.high_score);

        self.snake = Snake::new(self.grid.center());
        self.food = food::place(&self.grid, &self.snake, &mut self.rng);
        self.direction = Direction::Right;
        self.interval_ms = INITIAL_INTERVAL_MS;
        self.ticker.set_interval(Duration::from_millis(INITIAL_INTERVAL_MS));
        self.status = GameStatus::Idle;

        GameOverReport { result, score, high_score: self.high_score, new_high_score }
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            snake: self.snake.body(),
            food: if self.status == GameStatus::Running { self.food } else { None },
            score: format_score(self.score()),
            high_score: if self.rounds_played > 0 { Some(format_score(self.high_score)) } else { None },
            status: self.status,
        }
    }
}

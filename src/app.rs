use std::time::{Duration, Instant};

use anyhow::Result;
use rand::Rng;

use crate::game::{Command, Frame, GameLoop, GameOverReport, TickOutcome};

// How long to wait for input when no tick is pending
const IDLE_POLL: Duration = Duration::from_millis(50);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> Result<()>;
}

pub trait InputSource {
    /// Waits up to `timeout` for input and returns everything queued.
    fn poll_input(&mut self, timeout: Duration) -> Result<Vec<Input>>;
}

pub trait Notifier {
    /// Tells the player the round is over. May block until acknowledged.
    fn game_over(&mut self, report: &GameOverReport) -> Result<Flow>;
}

/// Drives the game until the player quits.
pub fn run<R, T, C>(game: &mut GameLoop<R>, term: &mut T, clock: &C) -> Result<()>
where
    R: Rng,
    T: Renderer + InputSource + Notifier,
    C: Clock,
{
    term.draw(&game.frame())?;

    loop {
        let timeout = game.time_until_tick(clock.now()).map_or(IDLE_POLL, |t| t.min(IDLE_POLL));
        let mut dirty = false;

        // Commands land before the tick below reads them
        for input in term.poll_input(timeout)? {
            match input {
                Input::Quit => return Ok(()),
                Input::Command(cmd) => {
                    let before = game.status();
                    game.handle(cmd, clock.now());
                    dirty |= game.status() != before;
                }
            }
        }

        match game.poll(clock.now()) {
            Some(TickOutcome::RoundOver(report)) => {
                if term.game_over(&report)? == Flow::Quit {
                    return Ok(());
                }
                dirty = true;
            }
            Some(_) => dirty = true,
            None => {}
        }

        if dirty {
            term.draw(&game.frame())?;
        }
    }
}

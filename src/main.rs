use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::WriteLogger;

use snake::{app, config::Config, game::GameLoop, grid::Grid, term::TermManager, GRID_SIZE};

fn main() -> Result<()> {
    let config = Config::parse();

    // The terminal belongs to the game, so logs go to a file
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("Error creating log file {}", config.log_file.display()))?;
    WriteLogger::init(config.log_level, simplelog::Config::default(), log_file)
        .context("Error initializing logger")?;

    info!("Starting snake, seed {:?}", config.seed);

    let grid = Grid::new(GRID_SIZE);
    let mut game = GameLoop::new(grid, config.rng());
    let mut term = TermManager::new(grid)?;
    term.setup()?;

    let res = app::run(&mut game, &mut term, &app::SystemClock);
    term.restore()?;

    info!("Exiting, high score {}", game.high_score());
    res
}

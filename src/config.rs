use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use rand::{rngs::StdRng, SeedableRng};

/// Grid snake for the terminal. Space starts a round, arrows or WASD steer,
/// q or Ctrl+C quits.
#[derive(Parser, Debug)]
#[command(name = "snake", version)]
pub struct Config {
    /// Seed for food placement, for reproducible rounds
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "snake.log")]
    pub log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Config {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["snake"]).unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.log_file, PathBuf::from("snake.log"));
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn explicit_values() {
        let config = Config::try_parse_from([
            "snake", "--seed", "7", "--log-file", "/tmp/s.log", "--log-level", "debug",
        ]).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_file, PathBuf::from("/tmp/s.log"));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn bad_level_is_rejected() {
        assert!(Config::try_parse_from(["snake", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn same_seed_same_draws() {
        let config = Config::try_parse_from(["snake", "--seed", "11"]).unwrap();
        let a: Vec<u32> = (0..5).map({ let mut r = config.rng(); move |_| r.gen() }).collect();
        let b: Vec<u32> = (0..5).map({ let mut r = config.rng(); move |_| r.gen() }).collect();
        assert_eq!(a, b);
    }
}

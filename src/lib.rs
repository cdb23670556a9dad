pub mod app;
pub mod collision;
pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod snake;
pub mod speed;
pub mod term;
pub mod ticker;

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);
pub type CoordInt = i32;

pub const GRID_SIZE: CoordInt = 20;

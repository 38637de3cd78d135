pub mod assets;
pub mod config;
pub mod entities;
pub mod game;
pub mod input;
pub mod level;
pub mod model;
pub mod motion;
pub mod progression;
pub mod rng;

pub use game::{Game, GameEvent};
pub use input::{Command, Direction};
pub use model::{GameState, Rules};
pub use rng::{Dice, RandomSource};

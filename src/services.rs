pub mod engine;
pub mod tally;

pub use engine::GameEngine;

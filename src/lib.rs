pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod utils;

pub use error::{GameError, Result};
pub use models::{config::EngineConfig, game::*, player::*, role::*};
pub use remote::*;
pub use services::GameEngine;

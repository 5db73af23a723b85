//! Flappy Lava - a side-scrolling Flappy Bird clone for the terminal
//!
//! Core modules:
//! - `sim`: fixed-step simulation (bird physics, pipes, collisions, session)
//! - `config`: tunables, JSON loading and validation
//! - `input`: input events and the `InputSource` capability
//! - `assets`: sprite decoding, background removal and caching
//! - `render`: renderer capability and frame composition
//! - `term`: crossterm pixel-buffer backend and key polling
//! - `audio`: optional sound effects
//! - `game`: the frame loop tying everything together

pub mod assets;
pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod render;
pub mod sim;
pub mod term;

pub use config::{GameConfig, HazardMode};
pub use error::{AssetError, ConfigError, GameError};
pub use game::{Flow, Game, GameContext};

//! Fixed-step simulation
//!
//! All gameplay logic lives here. One call to `Session::step` advances the
//! world by exactly one frame; nothing in this module reads the clock,
//! touches the terminal or draws.

pub mod background;
pub mod bird;
pub mod collision;
pub mod difficulty;
pub mod pipes;
pub mod session;

pub use background::Background;
pub use bird::{Bird, Pose};
pub use collision::{Hit, detect};
pub use difficulty::{Tier, tier_for};
pub use pipes::{Pipe, Track};
pub use session::{GameEvent, Phase, Session};

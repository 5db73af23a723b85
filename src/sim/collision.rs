//! Run-ending contacts: pipes, screen edges and lava bands

use super::bird::Bird;
use super::pipes::Pipe;
use crate::config::{GameConfig, HazardMode};

/// What the bird ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Index into the pipe sequence at the time of the hit
    Pipe(usize),
    Ceiling,
    Floor,
    TopLava,
    BottomLava,
}

impl Hit {
    pub fn describe(&self) -> &'static str {
        match self {
            Hit::Pipe(_) => "hit a pipe",
            Hit::Ceiling => "flew off the top",
            Hit::Floor => "fell off the bottom",
            Hit::TopLava => "touched the lava above",
            Hit::BottomLava => "touched the lava below",
        }
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// The top and bottom lava strips, if the mode has any.
pub fn lava_bands(config: &GameConfig) -> Option<[Rect; 2]> {
    match config.hazard {
        HazardMode::None => None,
        HazardMode::LavaBands { height, .. } => Some([
            Rect {
                x: 0.0,
                y: 0.0,
                w: config.screen_width,
                h: height,
            },
            Rect {
                x: 0.0,
                y: config.screen_height - height,
                w: config.screen_width,
                h: height,
            },
        ]),
    }
}

/// Whether the bird's hitbox pokes out of a pipe's gap while level with it.
pub fn hits_pipe(bird: &Bird, pipe: &Pipe) -> bool {
    if bird.right() > pipe.x && bird.left() < pipe.right() {
        bird.top() < pipe.gap_top || bird.bottom() > pipe.gap_bottom
    } else {
        false
    }
}

/// Boundary check on its own: screen edges, or lava bands in lava mode.
pub fn out_of_bounds(bird: &Bird, config: &GameConfig) -> Option<Hit> {
    match config.hazard {
        HazardMode::None => {
            if bird.top() < 0.0 {
                Some(Hit::Ceiling)
            } else if bird.bottom() > config.screen_height {
                Some(Hit::Floor)
            } else {
                None
            }
        }
        HazardMode::LavaBands { height, .. } => {
            if bird.top() < height {
                Some(Hit::TopLava)
            } else if bird.bottom() > config.screen_height - height {
                Some(Hit::BottomLava)
            } else {
                None
            }
        }
    }
}

/// First run-ending contact this frame, pipes before boundaries.
pub fn detect(bird: &Bird, pipes: &[Pipe], config: &GameConfig) -> Option<Hit> {
    pipes
        .iter()
        .position(|p| hits_pipe(bird, p))
        .map(Hit::Pipe)
        .or_else(|| out_of_bounds(bird, config))
}

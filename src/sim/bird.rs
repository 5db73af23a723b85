//! The player's bird: gravity, jumps and the pose derived from velocity

use crate::config::GameConfig;

/// Which wing sprite is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Fixed for the whole session
    pub x: f32,
    pub y: f32,
    /// Positive is downwards
    pub vel: f32,
    radius: f32,
    pub pose: Pose,
    /// Degrees, negative is nose-up
    pub tilt: f32,
    /// Frames spent climbing; drives the wing flap while ascending
    flap_count: u32,
}

impl Bird {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            vel: 0.0,
            radius,
            pose: Pose::Up,
            tilt: 0.0,
            flap_count: 0,
        }
    }

    /// Fresh bird at the configured start position.
    pub fn spawn(config: &GameConfig) -> Self {
        Self::new(config.bird_x, config.start_y(), config.bird_radius)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn top(&self) -> f32 {
        self.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.radius
    }

    pub fn left(&self) -> f32 {
        self.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.x + self.radius
    }

    /// Replace the current velocity with the jump impulse, whatever it was.
    pub fn jump(&mut self, impulse: f32) {
        self.vel = impulse;
    }

    /// Advance one frame: accumulate gravity, move, then pick a pose.
    pub fn integrate(&mut self, config: &GameConfig) {
        self.vel += config.gravity;
        self.y += self.vel;

        if config.hazard.clamps() {
            let band = config.hazard.band_height();
            let min_y = band + self.radius;
            let max_y = config.screen_height - band - self.radius;
            if self.y < min_y {
                self.y = min_y;
                self.vel = self.vel.max(0.0);
            } else if self.y > max_y {
                self.y = max_y;
                self.vel = self.vel.min(0.0);
            }
        }

        self.update_pose(config.pose_threshold, config.tilt_degrees);
    }

    fn update_pose(&mut self, threshold: f32, tilt: f32) {
        if self.vel < -threshold {
            // Climbing: alternate wing sprites every frame
            self.flap_count += 1;
            self.pose = if self.flap_count % 2 == 0 {
                Pose::Down
            } else {
                Pose::Up
            };
            self.tilt = -tilt;
        } else if self.vel > threshold {
            self.flap_count = 0;
            self.pose = Pose::Down;
            self.tilt = tilt;
        } else {
            self.flap_count = 0;
            self.pose = Pose::Up;
            self.tilt = 0.0;
        }
    }
}

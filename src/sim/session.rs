//! One play attempt: the bird, its pipes and the score
//!
//! A session only ever moves forward (Running, Paused, Ended). Restarting is
//! done by the caller, which throws the session away and builds a new one.

use rand_pcg::Pcg32;

use super::background::Background;
use super::bird::Bird;
use super::collision::{self, Hit};
use super::difficulty::{Tier, tier_for};
use super::pipes::{Pipe, Track};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::input::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Simulation frozen; only pause (to resume) and quit are honored
    Paused,
    /// Terminal for this session; only restart and quit are honored
    Ended,
}

/// Things that happened during input handling or a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Flapped,
    Scored { gained: u32, total: u32 },
    TierChanged(Tier),
    Crashed { cause: Hit, score: u32 },
    Paused,
    Resumed,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    bird: Bird,
    track: Track,
    background: Background,
    score: u32,
    phase: Phase,
    tier: Tier,
    frame: u64,
}

impl Session {
    /// Fresh session: bird at the start position, one pipe already spawned.
    pub fn new(config: &GameConfig, rng: Pcg32) -> Result<Self, ConfigError> {
        let mut session = Self::from_parts(config, Bird::spawn(config), Track::new(rng))?;
        session.track.spawn(config, session.tier.gap);
        Ok(session)
    }

    /// Session with a hand-placed bird and pipe layout. Nothing is spawned
    /// until the first step.
    pub fn from_parts(config: &GameConfig, bird: Bird, track: Track) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            bird,
            track,
            background: Background::new(config.screen_width, config.background_speed),
            score: 0,
            phase: Phase::Running,
            tier: tier_for(0),
            frame: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &[Pipe] {
        self.track.pipes()
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Steps simulated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// Apply a key press. Restart is not a session concern and is ignored.
    pub fn handle_key(&mut self, key: Key) -> Option<GameEvent> {
        match key {
            Key::Jump => self.jump(),
            Key::Pause => self.toggle_pause(),
            Key::Restart => None,
        }
    }

    pub fn jump(&mut self) -> Option<GameEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        self.bird.jump(self.config.jump_impulse);
        Some(GameEvent::Flapped)
    }

    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                Some(GameEvent::Paused)
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                Some(GameEvent::Resumed)
            }
            Phase::Ended => None,
        }
    }

    /// Advance one fixed frame. Does nothing unless running.
    pub fn step(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase != Phase::Running {
            return;
        }
        self.frame += 1;

        self.bird.integrate(&self.config);

        self.track.spawn_if_needed(&self.config, self.tier.gap);
        self.track.advance(self.tier.speed);
        let retired = self.track.retire_offscreen();
        if retired > 0 {
            self.score = self.score.saturating_add(retired);
            events.push(GameEvent::Scored {
                gained: retired,
                total: self.score,
            });
        }

        if let Some(cause) = collision::detect(&self.bird, self.track.pipes(), &self.config) {
            self.phase = Phase::Ended;
            events.push(GameEvent::Crashed {
                cause,
                score: self.score,
            });
        }

        let tier = tier_for(self.score);
        if tier != self.tier {
            self.tier = tier;
            events.push(GameEvent::TierChanged(tier));
        }

        self.background.advance();
    }
}

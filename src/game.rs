//! Frame loop: input, fixed step, sound, draw, present
//!
//! `Game` owns the current `Session` and replaces it wholesale on restart.
//! Each restart draws a fresh layout seed from a master generator, so a run
//! started with a fixed seed replays identically.

use std::thread;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::assets::AssetCache;
use crate::audio::Sfx;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::{InputEvent, InputSource, Key};
use crate::render::{self, Renderer, Sprites};
use crate::sim::{GameEvent, Session};

/// Everything the loop needs from the outside world.
pub struct GameContext<R, I> {
    pub config: GameConfig,
    pub renderer: R,
    pub input: I,
    pub assets: AssetCache,
    pub sfx: Sfx,
}

impl<R, I> GameContext<R, I> {
    /// Context with a fresh asset cache and no sound.
    pub fn new(config: GameConfig, renderer: R, input: I) -> Self {
        Self {
            assets: AssetCache::new(&config),
            config,
            renderer,
            input,
            sfx: Sfx::silent(),
        }
    }

    pub fn with_sfx(mut self, sfx: Sfx) -> Self {
        self.sfx = sfx;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Game<R, I> {
    ctx: GameContext<R, I>,
    sprites: Sprites,
    session: Session,
    seeds: Pcg32,
    best: u32,
    runs: u32,
    events: Vec<GameEvent>,
}

impl<R: Renderer, I: InputSource> Game<R, I> {
    pub fn new(mut ctx: GameContext<R, I>) -> Result<Self, GameError> {
        ctx.config.validate()?;
        let sprites = Sprites::load(&mut ctx.assets)?;

        let seed = ctx.config.seed.unwrap_or_else(rand::random);
        log::info!("Master seed {seed}");
        let mut seeds = Pcg32::seed_from_u64(seed);
        let session = Session::new(&ctx.config, Pcg32::seed_from_u64(seeds.random()))?;
        log::info!(
            "Run 1 started, hazard {}, {} fps",
            ctx.config.hazard.as_str(),
            ctx.config.fps
        );

        Ok(Self {
            ctx,
            sprites,
            session,
            seeds,
            best: 0,
            runs: 1,
            events: Vec::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Highest score of any finished run this process.
    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn renderer(&self) -> &R {
        &self.ctx.renderer
    }

    pub fn into_context(self) -> GameContext<R, I> {
        self.ctx
    }

    /// One loop iteration. Quit wins over anything else queued behind it.
    pub fn frame(&mut self) -> Result<Flow, GameError> {
        let mut restarted = false;
        for event in self.ctx.input.poll_events()? {
            match event {
                InputEvent::Quit => {
                    log::info!("Quit after {} run(s), best {}", self.runs, self.best);
                    return Ok(Flow::Quit);
                }
                InputEvent::Resize { cols, rows } => self.ctx.renderer.resize(cols, rows),
                InputEvent::KeyDown(Key::Restart) => {
                    if self.session.is_over() {
                        self.restart()?;
                        restarted = true;
                    }
                }
                InputEvent::KeyDown(key) => {
                    if let Some(e) = self.session.handle_key(key) {
                        self.events.push(e);
                    }
                }
            }
        }

        // A fresh session is shown once before it starts moving
        if !restarted {
            self.session.step(&mut self.events);
        }
        self.dispatch_events();

        render::draw_scene(&mut self.ctx.renderer, &self.session, &self.sprites, self.best);
        self.ctx.renderer.present()?;
        Ok(Flow::Continue)
    }

    /// Run frames at the configured rate until quit or an error.
    pub fn run(&mut self) -> Result<(), GameError> {
        let budget = self.ctx.config.frame_budget();
        loop {
            let frame_start = Instant::now();
            if self.frame()? == Flow::Quit {
                return Ok(());
            }

            // Frame pacing
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                thread::sleep(budget - elapsed);
            } else if elapsed > budget * 2 {
                log::warn!("Slow frame: {elapsed:?} against a {budget:?} budget");
            }
        }
    }

    fn restart(&mut self) -> Result<(), GameError> {
        let seed: u64 = self.seeds.random();
        self.session = Session::new(&self.ctx.config, Pcg32::seed_from_u64(seed))?;
        self.runs += 1;
        log::info!("Run {} started", self.runs);
        Ok(())
    }

    fn dispatch_events(&mut self) {
        for event in self.events.drain(..) {
            self.ctx.sfx.on_event(&event);
            match event {
                GameEvent::Crashed { cause, score } => {
                    self.best = self.best.max(score);
                    log::info!(
                        "Run {} over: {} with score {score} (best {})",
                        self.runs,
                        cause.describe(),
                        self.best
                    );
                }
                GameEvent::TierChanged(tier) => {
                    log::debug!("Difficulty now speed {} gap {}", tier.speed, tier.gap);
                }
                GameEvent::Scored { total, .. } => log::debug!("Score {total}"),
                GameEvent::Paused => log::debug!("Paused"),
                GameEvent::Resumed => log::debug!("Resumed"),
                GameEvent::Flapped => log::trace!("Flap"),
            }
        }
    }
}

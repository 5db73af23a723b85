//! Pipe spawning, scrolling and retirement

use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;

/// A top/bottom pipe pair with a passable gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    pub width: f32,
}

impl Pipe {
    pub fn new(x: f32, gap_top: f32, gap: f32, width: f32) -> Self {
        Self {
            x,
            gap_top,
            gap_bottom: gap_top + gap,
            width,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn gap(&self) -> f32 {
        self.gap_bottom - self.gap_top
    }

    /// Fully past the left edge of the screen.
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Gap top drawn uniformly from the whole units that keep the gap `margin`
/// away from both edges. Whole units keep `gap_bottom - gap_top` exact.
pub fn random_gap_top(rng: &mut impl Rng, screen_height: f32, gap: f32, margin: f32) -> f32 {
    let lo = margin.ceil() as i32;
    let hi = (screen_height - gap - margin).floor() as i32;
    if hi < lo {
        return margin;
    }
    rng.random_range(lo..=hi) as f32
}

/// Ordered pipes, oldest first. New pipes go on the tail, retired ones
/// leave from the head.
#[derive(Debug, Clone)]
pub struct Track {
    pipes: Vec<Pipe>,
    rng: Pcg32,
}

impl Track {
    pub fn new(rng: Pcg32) -> Self {
        Self {
            pipes: Vec::new(),
            rng,
        }
    }

    /// Track with a hand-placed layout.
    pub fn with_pipes(rng: Pcg32, pipes: Vec<Pipe>) -> Self {
        Self { pipes, rng }
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Append a pipe at the spawn line when the track is empty or the tail
    /// has moved far enough left. Returns whether one was added.
    pub fn spawn_if_needed(&mut self, config: &GameConfig, gap: f32) -> bool {
        let should_spawn = match self.pipes.last() {
            None => true,
            Some(tail) => tail.x < config.screen_width - config.spawn_spacing,
        };
        if should_spawn {
            self.spawn(config, gap);
        }
        should_spawn
    }

    /// Unconditionally append a pipe at the spawn line.
    pub fn spawn(&mut self, config: &GameConfig, gap: f32) {
        let top = random_gap_top(
            &mut self.rng,
            config.screen_height,
            gap,
            config.gap_margin(),
        );
        let pipe = Pipe::new(config.spawn_x(), top, gap, config.obstacle_width);
        log::trace!("Spawned pipe at x={} gap={}..{}", pipe.x, pipe.gap_top, pipe.gap_bottom);
        self.pipes.push(pipe);
    }

    pub fn advance(&mut self, speed: f32) {
        for p in &mut self.pipes {
            p.x -= speed;
        }
    }

    /// Drop every pipe that is fully off screen and return how many went.
    pub fn retire_offscreen(&mut self) -> u32 {
        let before = self.pipes.len();
        self.pipes.retain(|p| !p.is_off_screen());
        (before - self.pipes.len()) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn track() -> Track {
        Track::new(Pcg32::seed_from_u64(7))
    }

    #[test]
    fn pipe_geometry() {
        let p = Pipe::new(100.0, 80.0, 150.0, 50.0);
        assert_eq!(p.gap_bottom, 230.0);
        assert_eq!(p.gap(), 150.0);
        assert_eq!(p.right(), 150.0);
    }

    #[test]
    fn empty_track_spawns_at_lead_distance() {
        let config = GameConfig::default();
        let mut t = track();
        assert!(t.spawn_if_needed(&config, 150.0));
        assert_eq!(t.pipes().len(), 1);
        let p = &t.pipes()[0];
        assert_eq!(p.x, 500.0);
        assert_eq!(p.width, 50.0);
        assert!(p.gap_top >= 50.0 && p.gap_bottom <= 550.0);
    }

    #[test]
    fn waits_for_spacing_before_next_spawn() {
        let config = GameConfig::default();
        let mut t = track();
        t.spawn_if_needed(&config, 150.0);

        // Tail at 500 needs to drop below 400 - 200 = 200
        t.advance(300.0);
        assert!(!t.spawn_if_needed(&config, 150.0));
        t.advance(0.5);
        assert!(t.spawn_if_needed(&config, 150.0));
        assert_eq!(t.pipes().len(), 2);
        assert_eq!(t.pipes()[1].x, 500.0);
    }

    #[test]
    fn new_spawns_use_the_given_gap() {
        let config = GameConfig::default();
        let mut t = track();
        t.spawn(&config, 150.0);
        t.spawn(&config, 130.0);
        assert_eq!(t.pipes()[0].gap(), 150.0);
        assert_eq!(t.pipes()[1].gap(), 130.0);
    }

    #[test]
    fn retire_counts_each_pipe_once() {
        let pipes = vec![
            Pipe::new(-60.0, 100.0, 150.0, 50.0),
            Pipe::new(-51.0, 100.0, 150.0, 50.0),
            Pipe::new(-50.0, 100.0, 150.0, 50.0),
            Pipe::new(200.0, 100.0, 150.0, 50.0),
        ];
        let mut t = Track::with_pipes(Pcg32::seed_from_u64(1), pipes);
        assert_eq!(t.retire_offscreen(), 2);
        assert_eq!(t.pipes().len(), 2);
        // Right edge exactly at 0 is still on screen
        assert_eq!(t.pipes()[0].x, -50.0);
        assert_eq!(t.retire_offscreen(), 0);
    }

    #[test]
    fn gaps_always_respect_margins() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..1_000 {
            let top = random_gap_top(&mut rng, 600.0, 150.0, 50.0);
            assert!(top >= 50.0);
            assert!(top + 150.0 <= 550.0);
        }
    }

    #[test]
    fn gaps_stay_clear_of_tall_lava() {
        let config = GameConfig {
            hazard: crate::config::HazardMode::LavaBands {
                height: 180.0,
                clamp: false,
            },
            ..GameConfig::default()
        };
        for seed in 0..200 {
            let mut t = Track::new(Pcg32::seed_from_u64(seed));
            t.spawn(&config, 150.0);
            let pipe = &t.pipes()[0];
            assert!(pipe.gap_top >= 180.0);
            assert!(pipe.gap_bottom <= 420.0);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::default();
        let mut a = track();
        let mut b = track();
        for _ in 0..5 {
            a.spawn(&config, 150.0);
            b.spawn(&config, 150.0);
        }
        assert_eq!(a.pipes(), b.pipes());
    }
}

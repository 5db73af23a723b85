use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use flappy_lava::sim::difficulty::{BASE, HARD, HARDER};
use flappy_lava::sim::pipes::random_gap_top;
use flappy_lava::sim::{Background, Bird, Pipe, Session, Track, tier_for};
use flappy_lava::{GameConfig, HazardMode};

proptest! {
    #[test]
    fn velocity_accumulates_gravity(frames in 0u32..300) {
        let config = GameConfig::default();
        let mut bird = Bird::spawn(&config);
        let mut last = bird.vel;
        for _ in 0..frames {
            bird.integrate(&config);
            prop_assert!(bird.vel > last);
            last = bird.vel;
        }
        prop_assert_eq!(bird.vel, frames as f32 * config.gravity);
    }

    #[test]
    fn jump_sets_the_impulse(vel in -1000.0f32..1000.0) {
        let mut bird = Bird::new(50.0, 300.0, 15.0);
        bird.vel = vel;
        bird.jump(-10.0);
        prop_assert_eq!(bird.vel, -10.0);
    }

    #[test]
    fn gaps_fit_between_the_margins(seed in any::<u64>(), tier in 0usize..3) {
        let gap = [BASE, HARD, HARDER][tier].gap;
        let mut rng = Pcg32::seed_from_u64(seed);
        let top = random_gap_top(&mut rng, 600.0, gap, 50.0);
        let pipe = Pipe::new(500.0, top, gap, 50.0);
        prop_assert_eq!(pipe.gap_bottom - pipe.gap_top, gap);
        prop_assert!(pipe.gap_top >= 50.0);
        prop_assert!(pipe.gap_bottom <= 550.0);
    }

    #[test]
    fn score_grows_by_retired_count(xs in prop::collection::vec(-120.0f32..600.0, 0..12)) {
        let config = GameConfig::default();
        let mut sorted = xs;
        sorted.sort_by(f32::total_cmp);
        // Tall gaps so the bird survives whatever overlaps it
        let pipes: Vec<Pipe> = sorted.iter().map(|&x| Pipe::new(x, 20.0, 560.0, 50.0)).collect();
        let expected = pipes.iter().filter(|p| p.x - BASE.speed + p.width < 0.0).count() as u32;

        let bird = Bird::spawn(&config);
        let track = Track::with_pipes(Pcg32::seed_from_u64(1), pipes);
        let mut s = Session::from_parts(&config, bird, track).unwrap();
        let mut events = Vec::new();
        s.step(&mut events);
        prop_assert_eq!(s.score(), expected);
    }

    #[test]
    fn score_never_decreases(
        seed in any::<u64>(),
        jumps in prop::collection::vec(any::<bool>(), 1..400),
    ) {
        let config = GameConfig::default();
        let mut s = Session::new(&config, Pcg32::seed_from_u64(seed)).unwrap();
        let mut events = Vec::new();
        let mut last = 0;
        for jump in jumps {
            if jump {
                s.jump();
            }
            s.step(&mut events);
            prop_assert!(s.score() >= last);
            last = s.score();
            for p in s.pipes() {
                prop_assert!(p.gap_top >= config.obstacle_margin);
                prop_assert!(p.gap_bottom <= config.screen_height - config.obstacle_margin);
            }
        }
    }

    #[test]
    fn gaps_open_between_the_lava_bands(
        seed in any::<u64>(),
        height in 1.0f32..225.0,
        tier in 0usize..3,
    ) {
        let config = GameConfig {
            hazard: HazardMode::LavaBands { height, clamp: false },
            ..GameConfig::default()
        };
        prop_assert!(config.validate().is_ok());
        let gap = [BASE, HARD, HARDER][tier].gap;
        let mut track = Track::new(Pcg32::seed_from_u64(seed));
        track.spawn(&config, gap);
        let pipe = &track.pipes()[0];
        prop_assert!(pipe.gap_top >= height);
        prop_assert!(pipe.gap_bottom <= config.screen_height - height);
    }

    #[test]
    fn difficulty_is_monotonic(a in 0u32..100, b in 0u32..100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(tier_for(lo).speed <= tier_for(hi).speed);
        prop_assert!(tier_for(lo).gap >= tier_for(hi).gap);
    }

    #[test]
    fn background_never_falls_behind(speed in 0.1f32..2000.0, frames in 0usize..3000) {
        let mut bg = Background::new(400.0, speed);
        for _ in 0..frames {
            bg.advance();
            for x in bg.offsets() {
                prop_assert!(x > -400.0);
            }
        }
    }
}

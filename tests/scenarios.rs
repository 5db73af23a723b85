use rand::SeedableRng;
use rand_pcg::Pcg32;

use flappy_lava::input::{InputEvent, Key, ScriptedInput};
use flappy_lava::render::DrawLog;
use flappy_lava::sim::{Bird, GameEvent, Hit, Phase, Pipe, Session, Track, detect, tier_for};
use flappy_lava::term::TermRenderer;
use flappy_lava::{Flow, Game, GameConfig, GameContext, HazardMode};

fn rng() -> Pcg32 {
    Pcg32::seed_from_u64(2024)
}

fn seeded(seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    }
}

/// Session with a bird at `y` and the given pipes, nothing spawned yet.
fn session_with(config: &GameConfig, y: f32, pipes: Vec<Pipe>) -> Session {
    let bird = Bird::new(config.bird_x, y, config.bird_radius);
    Session::from_parts(config, bird, Track::with_pipes(rng(), pipes)).unwrap()
}

#[test]
fn free_fall_for_twenty_frames() {
    let config = GameConfig::default();
    let mut bird = Bird::spawn(&config);
    for _ in 0..20 {
        bird.integrate(&config);
    }
    assert_eq!(bird.vel, 10.0);
    assert_eq!(bird.y, 300.0 + 105.0);
    assert_eq!(detect(&bird, &[], &config), None);

    // Same thing through a whole session
    let mut s = Session::new(&config, rng()).unwrap();
    let mut events = Vec::new();
    for _ in 0..20 {
        s.step(&mut events);
    }
    assert_eq!(s.bird().vel, 10.0);
    assert_eq!(s.phase(), Phase::Running);
    assert!(events.is_empty());
}

#[test]
fn bird_inside_gap_is_safe() {
    let config = GameConfig::default();
    // Pipe spans x 40..90 and the bird 35..65
    let pipe = Pipe::new(40.0, 150.0, 150.0, 50.0);
    let bird = Bird::new(50.0, 225.0, 15.0);
    assert_eq!(detect(&bird, &[pipe.clone()], &config), None);

    let mut s = session_with(&config, 225.0, vec![pipe]);
    let mut events = Vec::new();
    s.step(&mut events);
    assert_eq!(s.phase(), Phase::Running);
}

#[test]
fn bird_below_gap_ends_the_session() {
    let config = GameConfig::default();
    let pipe = Pipe::new(40.0, 150.0, 150.0, 50.0);
    let bird = Bird::new(50.0, 400.0, 15.0);
    assert_eq!(detect(&bird, &[pipe.clone()], &config), Some(Hit::Pipe(0)));

    let mut s = session_with(&config, 400.0, vec![pipe]);
    let mut events = Vec::new();
    s.step(&mut events);
    assert_eq!(s.phase(), Phase::Ended);
    assert_eq!(
        events,
        [GameEvent::Crashed {
            cause: Hit::Pipe(0),
            score: 0
        }]
    );
}

#[test]
fn difficulty_thresholds() {
    let at = |score| {
        let t = tier_for(score);
        (t.speed, t.gap)
    };
    assert_eq!(at(5), (3.0, 150.0));
    assert_eq!(at(10), (3.0, 150.0));
    assert_eq!(at(11), (4.0, 140.0));
    assert_eq!(at(15), (4.0, 140.0));
    assert_eq!(at(20), (4.0, 140.0));
    assert_eq!(at(21), (5.0, 130.0));
    assert_eq!(at(25), (5.0, 130.0));
}

#[test]
fn restart_after_game_over_builds_a_fresh_session() {
    let mut input = ScriptedInput::default();
    // Falling from mid-screen hits the floor well within a second
    input.idle(60);
    input.push(vec![InputEvent::KeyDown(Key::Restart)]);
    let mut game = Game::new(GameContext::new(seeded(11), DrawLog::new(), input)).unwrap();

    for _ in 0..60 {
        game.frame().unwrap();
    }
    assert!(game.session().is_over());

    assert_eq!(game.frame().unwrap(), Flow::Continue);
    let s = game.session();
    assert_eq!(s.phase(), Phase::Running);
    assert_eq!(s.score(), 0);
    assert_eq!((s.bird().x, s.bird().y, s.bird().vel), (50.0, 300.0, 0.0));
    assert_eq!(s.pipes().len(), 1);
    assert_eq!(s.pipes()[0].x, 500.0);
    assert_eq!(game.runs(), 2);
    assert_eq!(game.renderer().last_texts(), ["SCORE: 0"]);
}

#[test]
fn pause_freezes_the_world_but_keeps_drawing() {
    let mut input = ScriptedInput::default();
    input.idle(3);
    input.push(vec![InputEvent::KeyDown(Key::Pause)]);
    input.push(vec![InputEvent::KeyDown(Key::Jump)]);
    input.idle(10);
    input.push(vec![InputEvent::KeyDown(Key::Pause)]);
    let mut game = Game::new(GameContext::new(seeded(3), DrawLog::new(), input)).unwrap();

    for _ in 0..4 {
        game.frame().unwrap();
    }
    let frozen = game.session().bird().clone();
    assert_eq!(game.session().phase(), Phase::Paused);
    for _ in 0..11 {
        game.frame().unwrap();
    }
    assert_eq!(game.session().bird(), &frozen);
    assert_eq!(game.renderer().last_texts(), ["SCORE: 0", "PAUSED"]);
    assert_eq!(game.renderer().frames().len(), 15);

    game.frame().unwrap();
    assert_eq!(game.session().phase(), Phase::Running);
    assert_eq!(game.session().frame(), 4);
}

#[test]
fn quit_is_honored_in_every_phase() {
    let quit_after = |batches: Vec<Vec<InputEvent>>, idle: usize| {
        let mut input = ScriptedInput::new(batches);
        input.idle(idle);
        input.push(vec![InputEvent::Quit]);
        let mut game = Game::new(GameContext::new(seeded(5), DrawLog::new(), input)).unwrap();
        let mut frames = 0;
        while game.frame().unwrap() == Flow::Continue {
            frames += 1;
            assert!(frames < 500);
        }
        game.session().phase()
    };

    assert_eq!(quit_after(vec![], 0), Phase::Running);
    assert_eq!(quit_after(vec![vec![InputEvent::KeyDown(Key::Pause)]], 5), Phase::Paused);
    assert_eq!(quit_after(vec![], 100), Phase::Ended);
}

#[test]
fn lethal_lava_ends_the_run() {
    let config = GameConfig {
        hazard: HazardMode::lava(false),
        ..GameConfig::default()
    };
    let mut s = Session::new(&config, rng()).unwrap();
    let mut events = Vec::new();
    while !s.is_over() {
        s.jump();
        s.step(&mut events);
        assert!(s.frame() < 100);
    }
    assert!(matches!(
        events.last(),
        Some(GameEvent::Crashed {
            cause: Hit::TopLava,
            ..
        })
    ));
}

#[test]
fn clamped_lava_holds_the_bird_in_the_corridor() {
    let config = GameConfig {
        hazard: HazardMode::lava(true),
        ..GameConfig::default()
    };
    // No pipes in reach for the first 100 frames
    let mut s = Session::new(&config, rng()).unwrap();
    let mut events = Vec::new();
    for _ in 0..40 {
        s.jump();
        s.step(&mut events);
        assert!(s.bird().top() >= 50.0);
    }
    assert_eq!(s.bird().top(), 50.0);
    for _ in 0..60 {
        s.step(&mut events);
        assert!(s.bird().bottom() <= 550.0);
    }
    assert_eq!(s.bird().bottom(), 550.0);
    assert_eq!(s.phase(), Phase::Running);
}

#[test]
fn terminal_backend_runs_the_whole_loop() {
    let config = GameConfig {
        fps: 240,
        ..seeded(8)
    };
    let renderer = TermRenderer::new(Vec::new(), 40, 30, &config);
    let mut input = ScriptedInput::new([vec![InputEvent::KeyDown(Key::Jump)]]);
    input.idle(8);
    input.push(vec![InputEvent::Resize { cols: 60, rows: 20 }]);
    input.push(vec![InputEvent::Quit]);

    let mut game = Game::new(GameContext::new(config, renderer, input)).unwrap();
    game.run().unwrap();
    assert_eq!(game.session().frame(), 10);

    let ctx = game.into_context();
    assert_eq!(ctx.renderer.pixels().width(), 60);
    assert_eq!(ctx.renderer.pixels().height(), 40);
    let out = ctx.renderer.into_inner();
    assert!(!out.is_empty());
}

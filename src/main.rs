use std::fs::File;
use std::io::{BufWriter, stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::terminal;

use flappy_lava::assets::SpriteId;
use flappy_lava::audio::Sfx;
use flappy_lava::term::{TermInput, TermRenderer, TerminalGuard};
use flappy_lava::{Game, GameConfig, GameContext, HazardMode};

#[derive(Debug, Parser)]
#[command(name = "flappy-lava", version)]
#[command(about = "Flappy Bird in your terminal. Space/Up/W flap, P pause, R restart, Q quit")]
struct Cli {
    /// JSON config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    hazard: Option<HazardArg>,
    /// Height of each lava band in world units
    #[arg(long)]
    lava_height: Option<f32>,
    /// Keep the bird out of the lava instead of ending the run
    #[arg(long, default_value_t = false)]
    lava_clamp: bool,
    /// Seed for the pipe layout
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    fps: Option<u32>,
    /// Directory with .sprite files replacing the built-in art
    #[arg(long)]
    assets: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    mute: bool,
    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print the effective config as JSON and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HazardArg {
    None,
    Lava,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = build_config(&cli)?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let renderer = TermRenderer::new(BufWriter::new(stdout()), cols, rows, &config);
    let sfx = Sfx::open(config.sound);
    let mut ctx = GameContext::new(config, renderer, TermInput).with_sfx(sfx);
    // Fail on bad art before the screen is taken over
    ctx.assets
        .preload(&SpriteId::ALL)
        .context("failed to load sprites")?;

    let guard = TerminalGuard::enter().context("failed to set up the terminal")?;
    let result = Game::new(ctx).and_then(|mut game| game.run());
    drop(guard);
    result.context("game aborted")
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    match cli.hazard {
        Some(HazardArg::None) => config.hazard = HazardMode::None,
        Some(HazardArg::Lava) => {
            config.hazard = HazardMode::LavaBands {
                height: cli.lava_height.unwrap_or(HazardMode::DEFAULT_LAVA_HEIGHT),
                clamp: cli.lava_clamp,
            }
        }
        None => {
            if let HazardMode::LavaBands { height, clamp } = &mut config.hazard {
                if let Some(h) = cli.lava_height {
                    *height = h;
                }
                *clamp |= cli.lava_clamp;
            }
        }
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(dir) = &cli.assets {
        config.assets_dir = Some(dir.clone());
    }
    if cli.mute {
        config.sound = false;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> Result<GameConfig> {
        let cli = Cli::try_parse_from(std::iter::once("flappy-lava").chain(args.iter().copied()))?;
        build_config(&cli)
    }

    #[test]
    fn defaults_without_flags() {
        assert_eq!(config_from(&[]).unwrap(), GameConfig::default());
    }

    #[test]
    fn lava_flags() {
        let args = ["--hazard", "lava", "--lava-height", "40", "--lava-clamp"];
        let config = config_from(&args).unwrap();
        assert_eq!(config.hazard, HazardMode::LavaBands { height: 40.0, clamp: true });

        let config = config_from(&["--hazard", "lava"]).unwrap();
        assert_eq!(config.hazard, HazardMode::lava(false));
    }

    #[test]
    fn overrides_apply() {
        let config = config_from(&["--seed", "7", "--fps", "30", "--mute"]).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.fps, 30);
        assert!(!config.sound);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        assert!(config_from(&["--fps", "0"]).is_err());
        assert!(config_from(&["--hazard", "lava", "--lava-height", "290"]).is_err());
        // Bands this tall leave no room for the widest gap
        assert!(config_from(&["--hazard", "lava", "--lava-height", "230"]).is_err());
        assert!(config_from(&["--hazard", "volcano"]).is_err());
    }
}

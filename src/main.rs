mod app;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use lanecross::config::{self, Settings};
use lanecross::Rules;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Parser, Debug, Clone)]
#[command(name = "lanecross")]
#[command(about = "Dodge the bugs, grab the key, leave through the door", long_about = None)]
struct Args {
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Frame cap; movement uses real elapsed time either way
    #[arg(long)]
    fps: Option<u32>,

    /// Monochrome output
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Never ring the terminal bell
    #[arg(long, default_value_t = false)]
    no_bell: bool,

    /// Fixed difficulty; keys and doors may spawn in column 0
    #[arg(long, default_value_t = false)]
    classic: bool,

    /// Settings file (defaults to the per-user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (defaults to the per-user data dir)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let paths = config::project_paths()?;

    let log_path = args.log.clone().unwrap_or(paths.log_path);
    init_tracing(&log_path)?;

    let settings_path = args.config.clone().unwrap_or(paths.settings_path);
    let settings = apply_args(config::load_or_create_settings(&settings_path)?, &args);
    tracing::info!(settings = %settings_path.display(), log = %log_path.display(), "starting");

    app::run(settings)
}

fn apply_args(mut s: Settings, args: &Args) -> Settings {
    if let Some(seed) = args.seed {
        s.seed = Some(seed);
    }
    if let Some(fps) = args.fps {
        s.fps_cap = fps;
    }
    if args.no_color {
        s.enable_color = false;
    }
    if args.no_bell {
        s.bell = false;
    }
    if args.classic {
        s.rules = Rules {
            base_enemies: s.rules.base_enemies,
            speed_divisor_ms: s.rules.speed_divisor_ms,
            max_tick_ms: s.rules.max_tick_ms,
            ..Rules::classic()
        };
    }
    s.rules = s.rules.sanitized();
    s
}

/// The terminal belongs to the game, so logs go to a file.
fn init_tracing(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_env("LANECROSS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let args = Args::parse_from(["lanecross", "--seed", "9", "--no-bell", "--classic"]);
        let mut base = Settings::default();
        base.rules.base_enemies = 8;
        let s = apply_args(base, &args);
        assert_eq!(s.seed, Some(9));
        assert!(!s.bell);
        assert!(s.enable_color);
        assert!(!s.rules.scale_with_level);
        assert_eq!(s.rules.key_min_col, 0);
        assert_eq!(s.rules.base_enemies, 8);
    }

    #[test]
    fn classic_flag_does_not_keep_broken_timings() {
        let args = Args::parse_from(["lanecross", "--classic"]);
        let mut base = Settings::default();
        base.rules.speed_divisor_ms = -3.0;
        base.rules.base_enemies = 0;
        let s = apply_args(base, &args);
        assert_eq!(s.rules.speed_divisor_ms, 10.0);
        assert_eq!(s.rules.base_enemies, 1);
    }

    #[test]
    fn no_flags_leave_settings_alone() {
        let args = Args::parse_from(["lanecross"]);
        assert_eq!(apply_args(Settings::default(), &args), Settings::default());
    }
}

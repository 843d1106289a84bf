//! Headless session: plays (or replays) a round without a window and reports how it ended.

use std::{error::Error, io, path::PathBuf};

use engine::logging::init_tracing;
use engine::regression::rgba_sha256_hex;
use engine::surface::{RgbaBufferSurface, SurfaceSize};
use engine::{HeadlessRunner, TimeMachine};
use tracing::{info, warn};

use platformer::assets::AssetStore;
use platformer::config::{Settings, SettingsStore};
use platformer::input::{Key, KeyEvent};
use platformer::logic::{FrameInput, PlatformerLogic};
use platformer::render::render;
use platformer::state::GameState;

const DEFAULT_MAX_FRAMES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Hold right and never jump; falls into the first gap.
    Run,
    /// Hold right and keep re-pressing up; hovers over every gap.
    Fly,
}

#[derive(Debug, Clone)]
struct Cli {
    help: bool,
    strategy: Strategy,
    max_frames: usize,
    record_path: Option<PathBuf>,
    replay_path: Option<PathBuf>,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            help: false,
            strategy: Strategy::Fly,
            max_frames: DEFAULT_MAX_FRAMES,
            record_path: None,
            replay_path: None,
        }
    }
}

fn print_help() {
    println!(
        r#"Platformer (headless)

Usage:
  platformer [--strategy run|fly] [--max-frames N] [--record PATH]
  platformer --replay PATH

Flags:
  --strategy S      Autoplay strategy: `fly` (default) wins, `run` falls into the first gap.
  --max-frames N    Stop after N frames even if the round is still running (default {DEFAULT_MAX_FRAMES}).
  --record PATH     Save the frame-by-frame state history to a JSON file.
  --replay PATH     Load a saved history and report its final frame instead of playing.
  --help, -h        Show this help."#
    );
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.into())
}

fn parse_cli() -> io::Result<Cli> {
    let mut cli = Cli::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.help = true,
            "--strategy" => {
                cli.strategy = match args.next().as_deref() {
                    Some("run") => Strategy::Run,
                    Some("fly") => Strategy::Fly,
                    other => return Err(invalid(format!("unknown strategy: {other:?}"))),
                };
            }
            "--max-frames" => {
                let value = args.next().ok_or_else(|| invalid("--max-frames requires a number"))?;
                cli.max_frames = value
                    .parse()
                    .map_err(|_| invalid(format!("--max-frames: not a number: {value}")))?;
            }
            "--record" => {
                let path = args.next().ok_or_else(|| invalid("--record requires a path"))?;
                cli.record_path = Some(PathBuf::from(path));
            }
            "--replay" => {
                let path = args.next().ok_or_else(|| invalid("--replay requires a path"))?;
                cli.replay_path = Some(PathBuf::from(path));
            }
            other => return Err(invalid(format!("unknown argument: {other} (try --help)"))),
        }
    }

    if cli.record_path.is_some() && cli.replay_path.is_some() {
        return Err(invalid("cannot combine --record and --replay"));
    }
    Ok(cli)
}

fn autoplay_input(strategy: Strategy, frame: usize) -> FrameInput {
    let mut events = Vec::new();
    if frame == 0 {
        events.push(KeyEvent::pressed(Key::ArrowRight));
    }
    if strategy == Strategy::Fly {
        events.push(KeyEvent::pressed(Key::ArrowUp));
    }
    FrameInput { events }
}

fn final_frame_hash(state: &GameState, assets: &AssetStore) -> String {
    let size = SurfaceSize::new(
        state.config.canvas_width.round() as u32,
        state.config.canvas_height.round() as u32,
    );
    let mut surface = RgbaBufferSurface::new(size);
    render(state, assets, &mut surface.canvas());
    rgba_sha256_hex(surface.frame())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = parse_cli()?;
    if cli.help {
        print_help();
        return Ok(());
    }

    let store = SettingsStore::from_env();
    let (settings, settings_err) = match store.load() {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    };
    init_tracing(&settings.log_level);
    if let Some(err) = settings_err {
        warn!("{err}; using default settings");
    }

    let assets = AssetStore::placeholder()?;
    assets.require_all()?;

    let (frames, state) = match &cli.replay_path {
        Some(path) => {
            let mut tm = TimeMachine::<GameState>::load_json_file(path)?;
            let last = tm.seek(tm.len().saturating_sub(1));
            info!(path = %path.display(), frames = tm.len(), "loaded recording");
            (last, tm.state().clone())
        }
        None => {
            let logic = PlatformerLogic::new(settings.game);
            let mut runner = HeadlessRunner::new(logic);
            let strategy = cli.strategy;
            info!(?strategy, max_frames = cli.max_frames, "autoplay");
            let last = runner.run_until_halt(cli.max_frames, |frame| autoplay_input(strategy, frame));
            if let Some(path) = &cli.record_path {
                runner.timemachine().save_json_file(path)?;
                info!(path = %path.display(), "saved recording");
            }
            (last, runner.state().clone())
        }
    };

    println!(
        "frame {} phase {:?} ticks {} scroll_offset {} / {} final_frame_sha256 {}",
        frames,
        state.phase,
        state.ticks,
        state.world.scroll_offset,
        state.world.max_limit,
        final_frame_hash(&state, &assets)
    );
    Ok(())
}

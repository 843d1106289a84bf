use std::{
    error::Error,
    io,
    mem,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::app::{AppConfig, GameApp, run_game};
use engine::graphics::Canvas;
use engine::logging::init_tracing;
use engine::surface::SurfaceSize;
use engine::{GameLogic, Tick, TimeMachine};
use tracing::{error, info, warn};
use winit::event::{ElementState, VirtualKeyCode};

use platformer::assets::AssetStore;
use platformer::config::{Settings, SettingsStore};
use platformer::headful::input_adapter::map_key_event;
use platformer::input::KeyEvent;
use platformer::logic::{FrameInput, PlatformerLogic};
use platformer::render::render;
use platformer::state::GameState;

#[derive(Debug, Default, Clone)]
struct HeadfulCli {
    help: bool,
    record: bool,
    record_path: Option<PathBuf>,
}

fn print_headful_help() {
    println!(
        r#"Platformer

Usage:
  headful [--record [PATH]]

Controls:
  A/D or Left/Right   walk
  W or Up             jump (release to stop rising)
  Enter               start / replay

Flags:
  --record [PATH]   Save the frame-by-frame state history to a JSON file on exit.
                    If PATH is omitted, writes to: target/recordings/headful_<nanos>.json
  --help, -h        Show this help.

Settings are read from $PLATFORMER_CONFIG, else $XDG_CONFIG_HOME/platformer/settings.json.
RUST_LOG overrides the configured log level."#
    );
}

fn default_recording_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    PathBuf::from("target")
        .join("recordings")
        .join(format!("headful_{nanos}.json"))
}

fn parse_headful_cli() -> io::Result<HeadfulCli> {
    let mut cli = HeadfulCli::default();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.help = true,
            "--record" => {
                cli.record = true;
                if let Some(next) = args.next_if(|next| !next.starts_with("--")) {
                    cli.record_path = Some(PathBuf::from(next));
                }
            }
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unknown argument: {other} (try --help)"),
                ));
            }
        }
    }

    Ok(cli)
}

struct Recorder {
    path: PathBuf,
    timemachine: TimeMachine<GameState>,
}

struct HeadfulApp {
    logic: PlatformerLogic,
    state: GameState,
    assets: AssetStore,
    /// Key events since the last frame.
    queued: Vec<KeyEvent>,
    running: bool,
    recorder: Option<Recorder>,
}

impl HeadfulApp {
    fn new(logic: PlatformerLogic, assets: AssetStore, record_path: Option<PathBuf>) -> Self {
        let state = GameState::new(*logic.config());
        let recorder = record_path.map(|path| Recorder {
            path,
            timemachine: TimeMachine::new(state.clone()),
        });
        Self {
            logic,
            state,
            assets,
            queued: Vec::new(),
            running: true,
            recorder,
        }
    }
}

impl GameApp for HeadfulApp {
    fn handle_key(&mut self, key: VirtualKeyCode, state: ElementState) -> Tick {
        let event = map_key_event(key, state);
        self.queued.push(event);
        if self.running || event.is_confirm() {
            Tick::Continue
        } else {
            Tick::Halt
        }
    }

    fn update(&mut self) -> Tick {
        let input = FrameInput {
            events: mem::take(&mut self.queued),
        };
        let tick = self.logic.step(&mut self.state, input);
        self.running = tick.is_continue();
        if let Some(recorder) = &mut self.recorder {
            recorder.timemachine.record(self.state.clone());
        }
        tick
    }

    fn render(&mut self, canvas: &mut dyn Canvas) {
        render(&self.state, &self.assets, canvas);
    }

    fn exit(&mut self) {
        let Some(recorder) = &self.recorder else {
            return;
        };
        match recorder.timemachine.save_json_file(&recorder.path) {
            Ok(()) => info!(
                path = %recorder.path.display(),
                frames = recorder.timemachine.len(),
                "saved recording"
            ),
            Err(err) => error!(path = %recorder.path.display(), "failed saving recording: {err}"),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = parse_headful_cli()?;
    if cli.help {
        print_headful_help();
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

    let logic = PlatformerLogic::new(settings.game);
    let config = *logic.config();
    let record_path = cli
        .record
        .then(|| cli.record_path.clone().unwrap_or_else(default_recording_path));
    if let Some(path) = &record_path {
        info!(path = %path.display(), "recording enabled");
    }

    let app = HeadfulApp::new(logic, assets, record_path);
    run_game(
        AppConfig {
            title: "Platformer".to_string(),
            canvas_size: SurfaceSize::new(
                config.canvas_width.round() as u32,
                config.canvas_height.round() as u32,
            ),
            clamp_to_monitor: true,
            vsync: None,
            frame_hz: settings.frame_hz,
        },
        app,
    )
}

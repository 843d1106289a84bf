//! Render-hash regression checks.
//!
//! A scenario is played headlessly, every recorded state is rendered into an RGBA buffer and
//! hashed (SHA-256). The recording is then written to JSON, loaded back and replayed; a replay
//! that renders differently from the live run is an error. The replay hashes can finally be
//! compared against a golden file kept under the crate's `tests/goldens/`.
//!
//! Drawing stays game-specific: callers pass the render closure.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::{GameLogic, HeadlessRunner, TimeMachine, graphics::CpuCanvas, surface::SurfaceSize};

const GOLDEN_VERSION: u32 = 1;
const HASH_ALG: &str = "sha256";

#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a valid golden file: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("golden metadata mismatch at {}: expected {expected}, got {actual}", .path.display())]
    Metadata {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    #[error("golden frame count mismatch at {}: expected {expected} hashes, got {actual}", .path.display())]
    FrameCount {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
    #[error("golden mismatch at {} (frame {frame}): expected {expected}, got {actual}", .path.display())]
    Frame {
        path: PathBuf,
        frame: usize,
        expected: String,
        actual: String,
    },
    #[error("replay of {name} diverged from the live run at frame {frame}")]
    ReplayDiverged { name: String, frame: usize },
}

impl RegressionError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// True when the variable is set to `1`, `true`, `yes` or `on` (any case).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// `ENGINE_UPDATE_GOLDENS` lets golden checks rewrite their files instead of failing.
pub fn update_goldens_enabled() -> bool {
    env_flag("ENGINE_UPDATE_GOLDENS")
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

/// `<crate>/tests/goldens/<name>.json` for the crate the macro is expanded in.
#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {
        ::std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{}.json", $crate::regression::sanitize_filename($name)))
    };
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    hex::encode(Sha256::digest(rgba))
}

/// Per-frame render hashes of one scenario, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, width: u32, height: u32, hashes: Vec<String>) -> Self {
        Self {
            version: GOLDEN_VERSION,
            name: name.into(),
            width,
            height,
            hash_alg: HASH_ALG.to_string(),
            hashes,
        }
    }

    pub fn load(path: &Path) -> Result<Self, RegressionError> {
        let raw = fs::read_to_string(path).map_err(|e| RegressionError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|source| RegressionError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), RegressionError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RegressionError::io(path, e))?;
        }
        let mut json = serde_json::to_string_pretty(self).map_err(|source| RegressionError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        json.push('\n');
        fs::write(path, json).map_err(|e| RegressionError::io(path, e))
    }

    fn describe(&self) -> String {
        format!(
            "v{} {} {}x{}",
            self.version, self.hash_alg, self.width, self.height
        )
    }

    /// Checks `actual` against `self` (the expected golden read from `path`).
    pub fn compare(&self, actual: &Self, path: &Path) -> Result<(), RegressionError> {
        let (expected_meta, actual_meta) = (self.describe(), actual.describe());
        if expected_meta != actual_meta {
            return Err(RegressionError::Metadata {
                path: path.to_path_buf(),
                expected: expected_meta,
                actual: actual_meta,
            });
        }
        if self.hashes.len() != actual.hashes.len() {
            return Err(RegressionError::FrameCount {
                path: path.to_path_buf(),
                expected: self.hashes.len(),
                actual: actual.hashes.len(),
            });
        }
        match self
            .hashes
            .iter()
            .zip(&actual.hashes)
            .position(|(a, b)| a != b)
        {
            Some(frame) => Err(RegressionError::Frame {
                path: path.to_path_buf(),
                frame,
                expected: self.hashes[frame].clone(),
                actual: actual.hashes[frame].clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Compares `hashes` with the golden at `path`. The golden is (re)written instead when it does
/// not exist yet or `update` is set.
pub fn assert_or_update_golden_hashes(
    path: impl AsRef<Path>,
    name: &str,
    width: u32,
    height: u32,
    hashes: Vec<String>,
    update: bool,
) -> Result<(), RegressionError> {
    let path = path.as_ref();
    let actual = FrameHashGolden::new(name, width, height, hashes);

    let exists = path.exists();
    if update || !exists {
        actual.save(path)?;
        info!(path = %path.display(), created = !exists, frames = actual.hashes.len(), "wrote golden");
        return Ok(());
    }

    FrameHashGolden::load(path)?.compare(&actual, path)
}

#[derive(Debug, Clone)]
pub struct HashArtifacts {
    /// Recording written between the live run and the replay.
    pub state_json: PathBuf,
    pub live_hashes: Vec<String>,
    pub replay_hashes: Vec<String>,
}

/// Hashes each of `states` rendered into a cleared `width`x`height` buffer.
pub fn render_hashes<'s, S, I, Render>(
    states: I,
    width: u32,
    height: u32,
    mut render: Render,
) -> Vec<String>
where
    S: 's,
    I: IntoIterator<Item = &'s S>,
    Render: FnMut(&S, &mut CpuCanvas<'_>),
{
    let size = SurfaceSize::new(width, height);
    let mut buf = vec![0u8; size.rgba_len()];
    states
        .into_iter()
        .map(|state| {
            buf.fill(0);
            render(state, &mut CpuCanvas::new(&mut buf, size));
            rgba_sha256_hex(&buf)
        })
        .collect()
}

/// Plays `drive` live, saves the recording under `out_dir`, replays it from disk frame by frame
/// and fails if any replayed frame renders differently.
pub fn record_state_then_replay_and_compare_render_hashes_with<G, Drive, Render>(
    name: &str,
    out_dir: impl AsRef<Path>,
    game: G,
    drive: Drive,
    width: u32,
    height: u32,
    mut render: Render,
) -> Result<HashArtifacts, RegressionError>
where
    G: GameLogic + Clone,
    G::State: Clone + Serialize + DeserializeOwned,
    Drive: FnOnce(&mut HeadlessRunner<G>),
    Render: FnMut(&G::State, &mut CpuCanvas<'_>),
{
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|e| RegressionError::io(out_dir, e))?;
    let state_json = out_dir.join(format!("{}.json", sanitize_filename(name)));

    let mut live = HeadlessRunner::new(game.clone());
    drive(&mut live);
    let live_hashes = render_hashes(live.history(), width, height, &mut render);
    live.timemachine()
        .save_json_file(&state_json)
        .map_err(|e| RegressionError::io(&state_json, e))?;

    let recording = TimeMachine::<G::State>::load_json_file(&state_json)
        .map_err(|e| RegressionError::io(&state_json, e))?;
    let mut replay = HeadlessRunner::from_timemachine(game, recording);
    let frames = replay.history().len();
    let mut replay_hashes = Vec::with_capacity(frames);
    for frame in 0..frames {
        replay.seek(frame);
        replay_hashes.extend(render_hashes([replay.state()], width, height, &mut render));
    }

    if let Some(frame) = (0..live_hashes.len().max(replay_hashes.len()))
        .find(|&i| live_hashes.get(i) != replay_hashes.get(i))
    {
        return Err(RegressionError::ReplayDiverged {
            name: name.to_string(),
            frame,
        });
    }

    Ok(HashArtifacts {
        state_json,
        live_hashes,
        replay_hashes,
    })
}

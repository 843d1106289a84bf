use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::{
    GameLogic, Tick,
    geometry::Rect,
    graphics::{Canvas, CpuCanvas, TextStyle},
    regression::{
        assert_or_update_golden_hashes, record_state_then_replay_and_compare_render_hashes_with,
        update_goldens_enabled,
    },
};
use serde::{Deserialize, Serialize};

fn unique_temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("engine_golden_hashes_{nanos}"))
}

const CELL: u32 = 8;

/// A block that slides one cell per frame and stops at the right wall.
#[derive(Debug, Clone, Copy)]
struct SlideGame {
    cells: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slide {
    x: i32,
    bumps: u32,
}

impl GameLogic for SlideGame {
    type State = Slide;
    type Input = i32;

    fn initial_state(&self) -> Self::State {
        Slide { x: 0, bumps: 0 }
    }

    fn step(&self, state: &mut Self::State, dx: Self::Input) -> Tick {
        state.x += dx;
        if state.x >= self.cells - 1 {
            state.x = self.cells - 1;
            state.bumps += 1;
            return Tick::Halt;
        }
        Tick::Continue
    }
}

fn draw_slide(state: &Slide, gfx: &mut CpuCanvas<'_>) {
    gfx.clear([10, 10, 30, 255]);
    gfx.fill_rect(
        Rect::new(state.x * CELL as i32, 0, CELL, CELL),
        [240, 200, 40, 255],
    );
    gfx.fill_text(
        &state.bumps.to_string(),
        1,
        CELL as i32 + 1,
        TextStyle::new([255, 255, 255, 255], 1),
    );
}

#[test]
fn golden_slide_render_hashes_are_stable() {
    let name = "golden_slide_render_hashes_are_stable";
    let out_dir = unique_temp_dir();

    let game = SlideGame { cells: 6 };
    let width = game.cells as u32 * CELL;
    let height = CELL * 2;

    let artifacts = record_state_then_replay_and_compare_render_hashes_with(
        name,
        &out_dir,
        game,
        |runner| {
            runner.run_until_halt(100, |_| 1);
        },
        width,
        height,
        draw_slide,
    )
    .expect("hash regression run should succeed");

    assert_eq!(artifacts.live_hashes.len(), 6);
    assert_ne!(artifacts.live_hashes[0], artifacts.live_hashes[1]);

    let golden_path = engine::regression_golden_path!(name);
    assert!(
        golden_path.exists() || update_goldens_enabled(),
        "baseline {} is missing; generate it with ENGINE_UPDATE_GOLDENS=1",
        golden_path.display()
    );
    assert_or_update_golden_hashes(
        &golden_path,
        name,
        width,
        height,
        artifacts.replay_hashes,
        update_goldens_enabled(),
    )
    .unwrap_or_else(|e| {
        panic!(
            "golden check failed: {e}\n(hint: set ENGINE_UPDATE_GOLDENS=1 to generate/update {})",
            golden_path.display()
        )
    });

    // Clean up on success; keep the temp dir if the test fails.
    let _ = fs::remove_file(artifacts.state_json);
    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn golden_mismatch_is_reported() {
    let path = unique_temp_dir().join("mismatch.json");
    let hashes = vec!["aa".to_string(), "bb".to_string()];
    assert_or_update_golden_hashes(&path, "mismatch", 2, 2, hashes.clone(), false)
        .expect("missing golden is written");
    assert_or_update_golden_hashes(&path, "mismatch", 2, 2, hashes, false)
        .expect("identical hashes match");

    let err = assert_or_update_golden_hashes(
        &path,
        "mismatch",
        2,
        2,
        vec!["aa".to_string(), "cc".to_string()],
        false,
    )
    .expect_err("changed frame must fail");
    assert!(err.to_string().contains("frame 1"), "{err}");

    let err = assert_or_update_golden_hashes(&path, "mismatch", 3, 2, vec![], false)
        .expect_err("size change must fail");
    assert!(err.to_string().contains("metadata"), "{err}");

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

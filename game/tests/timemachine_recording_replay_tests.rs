use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::{HeadlessRunner, TimeMachine};
use platformer::input::{Key, KeyEvent};
use platformer::logic::{FrameInput, PlatformerLogic};
use platformer::state::GameState;

fn unique_temp_json_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("platformer_test_timemachine_{nanos}.json"))
}

#[test]
fn platformer_timemachine_can_be_saved_and_replayed_from_disk() {
    let logic = PlatformerLogic::default();
    let mut runner = HeadlessRunner::new(logic);

    runner.step(FrameInput::keys([KeyEvent::pressed(Key::D)]));
    runner.run((0..30).map(|_| FrameInput::none()));
    runner.step(FrameInput::keys([KeyEvent::pressed(Key::W)]));
    runner.step(FrameInput::keys([KeyEvent::released(Key::W), KeyEvent::released(Key::D)]));

    let out = unique_temp_json_path();
    runner
        .timemachine()
        .save_json_file(&out)
        .expect("save platformer timemachine json");

    let loaded_tm =
        TimeMachine::<GameState>::load_json_file(&out).expect("load platformer timemachine json");
    let replay_runner = HeadlessRunner::from_timemachine(logic, loaded_tm);

    assert_eq!(replay_runner.frame(), runner.frame());
    assert_eq!(replay_runner.state(), runner.state());
    assert_eq!(replay_runner.history(), runner.history());

    let _ = fs::remove_file(out);
}

#[test]
fn game_state_round_trip_preserves_state() {
    let mut runner = HeadlessRunner::new(PlatformerLogic::default());
    runner.step(FrameInput::keys([KeyEvent::pressed(Key::ArrowRight)]));
    runner.run((0..200).map(|_| FrameInput::none()));
    let state = runner.state();

    let json = serde_json::to_string(state).expect("serialize game state");
    let restored: GameState = serde_json::from_str(&json).expect("deserialize game state");
    assert_eq!(&restored, state);
}

use engine::{GameLogic, Tick};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::input::KeyEvent;
use crate::state::GameState;
use crate::update::tick;

/// Key events that arrived since the previous frame, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub events: Vec<KeyEvent>,
}

impl FrameInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn keys(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformerLogic {
    config: GameConfig,
}

impl PlatformerLogic {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl GameLogic for PlatformerLogic {
    type State = GameState;
    type Input = FrameInput;

    /// A round that is already running; headless runs have nobody to press start.
    fn initial_state(&self) -> Self::State {
        let mut state = GameState::new(self.config);
        state.start();
        state
    }

    /// Delivers the frame's key events, then plays one frame if a round is running.
    ///
    /// A replay confirm starts the new round and plays its first frame in the same step. The
    /// loop halts as soon as the round is over.
    fn step(&self, state: &mut Self::State, input: Self::Input) -> Tick {
        for event in input.events {
            state.handle_key(event);
        }
        tick(state);
        if state.phase.is_running() {
            Tick::Continue
        } else {
            Tick::Halt
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Idle,
    Running,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    Start,
    ReachedGoal,
    FellOut,
    Replay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEffect {
    None,
    /// Rebuild the whole game state from scratch.
    Reset,
    /// The round ended; stop scheduling frames and wait for a confirm key.
    Complete,
}

impl GamePhase {
    /// Pure transition function for the game phase.
    ///
    /// Side-effects are reported via `PhaseEffect` so callers stay deterministic and easy to
    /// test. Events that don't apply to the current phase are ignored, which is what makes a
    /// win or loss fire only once.
    pub fn handle(self, event: PhaseEvent) -> (GamePhase, PhaseEffect) {
        match (self, event) {
            (GamePhase::Idle, PhaseEvent::Start) => (GamePhase::Running, PhaseEffect::Reset),

            (GamePhase::Running, PhaseEvent::ReachedGoal) => (GamePhase::Won, PhaseEffect::Complete),
            (GamePhase::Running, PhaseEvent::FellOut) => (GamePhase::Lost, PhaseEffect::Complete),

            (GamePhase::Won | GamePhase::Lost, PhaseEvent::Replay) => {
                (GamePhase::Running, PhaseEffect::Reset)
            }

            (phase, _) => (phase, PhaseEffect::None),
        }
    }

    pub fn is_running(self) -> bool {
        self == GamePhase::Running
    }

    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

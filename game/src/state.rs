use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::input::{InputTracker, Intent, KeyEvent};
use crate::phase::{GamePhase, PhaseEffect, PhaseEvent};
use crate::player::Player;
use crate::world::World;

/// The whole game, owned by whichever loop drives it. Restarting replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub player: Player,
    pub world: World,
    pub input: InputTracker,
    /// Intents received since the last frame, applied in arrival order at the next one.
    pub pending: Vec<Intent>,
    /// Frames played in the current round.
    pub ticks: u64,
    /// 1 for the first round, incremented on every replay.
    pub round: u32,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            phase: GamePhase::Idle,
            player: Player::new(&config),
            world: World::build(&config),
            input: InputTracker::default(),
            pending: Vec::new(),
            ticks: 0,
            round: 0,
        }
    }

    pub fn start(&mut self) -> PhaseEffect {
        self.dispatch(PhaseEvent::Start)
    }

    /// Feeds one phase event through the transition function and carries out its effect.
    pub fn dispatch(&mut self, event: PhaseEvent) -> PhaseEffect {
        let (next, effect) = self.phase.handle(event);
        match effect {
            PhaseEffect::Reset => {
                let round = self.round + 1;
                *self = GameState {
                    phase: next,
                    round,
                    ..GameState::new(self.config)
                };
                info!(round, "round started");
            }
            PhaseEffect::Complete => {
                self.phase = next;
                self.input = InputTracker::default();
                self.pending.clear();
                info!(
                    outcome = ?next,
                    scroll_offset = self.world.scroll_offset,
                    ticks = self.ticks,
                    "round over"
                );
            }
            PhaseEffect::None => self.phase = next,
        }
        effect
    }

    /// Routes a raw key event.
    ///
    /// While a round runs, direction keys update the tracker and queue intents. Otherwise only
    /// the confirm key is listened to, and it starts or replays a round.
    pub fn handle_key(&mut self, event: KeyEvent) -> PhaseEffect {
        if self.phase.is_running() {
            if let Some(intent) = self.input.handle(event) {
                if intent != Intent::Confirm {
                    debug!(?intent, "queued");
                    self.pending.push(intent);
                }
            }
            return PhaseEffect::None;
        }

        if !event.is_confirm() {
            return PhaseEffect::None;
        }
        match self.phase {
            GamePhase::Idle => self.dispatch(PhaseEvent::Start),
            _ => self.dispatch(PhaseEvent::Replay),
        }
    }

    pub fn take_intents(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::vec2::Vec2;

    fn running() -> GameState {
        let mut state = GameState::new(GameConfig::default());
        assert_eq!(state.start(), PhaseEffect::Reset);
        state
    }

    #[test]
    fn new_state_is_idle_and_ignores_direction_keys() {
        let mut state = GameState::new(GameConfig::default());
        assert_eq!(state.phase, GamePhase::Idle);
        state.handle_key(KeyEvent::pressed(Key::D));
        assert!(state.pending.is_empty());
        assert!(!state.input.right);
    }

    #[test]
    fn confirm_in_idle_starts_the_first_round() {
        let mut state = GameState::new(GameConfig::default());
        assert_eq!(state.handle_key(KeyEvent::pressed(Key::Enter)), PhaseEffect::Reset);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.round, 1);
    }

    #[test]
    fn running_queues_intents_in_order() {
        let mut state = running();
        state.handle_key(KeyEvent::pressed(Key::ArrowRight));
        state.handle_key(KeyEvent::pressed(Key::W));
        state.handle_key(KeyEvent::pressed(Key::Enter));
        state.handle_key(KeyEvent::pressed(Key::S));
        assert_eq!(state.take_intents(), vec![Intent::MoveRight, Intent::Jump]);
        assert!(state.pending.is_empty());
        assert!(state.input.right && state.input.up && state.input.down);
    }

    #[test]
    fn completing_a_round_detaches_input() {
        let mut state = running();
        state.handle_key(KeyEvent::pressed(Key::D));
        assert_eq!(state.dispatch(PhaseEvent::FellOut), PhaseEffect::Complete);
        assert_eq!(state.phase, GamePhase::Lost);
        assert!(!state.input.right);
        assert!(state.pending.is_empty());

        state.handle_key(KeyEvent::pressed(Key::A));
        assert!(state.pending.is_empty());
        assert_eq!(state.phase, GamePhase::Lost);
    }

    #[test]
    fn replay_replaces_the_state_wholesale() {
        let mut state = running();
        state.player.pos = Vec2::new(400.0, 600.0);
        let config = state.config;
        state.world.scroll_right(&config);
        state.ticks = 99;
        state.dispatch(PhaseEvent::FellOut);

        assert_eq!(state.handle_key(KeyEvent::released(Key::Enter)), PhaseEffect::None);
        assert_eq!(state.handle_key(KeyEvent::pressed(Key::Enter)), PhaseEffect::Reset);

        let fresh = GameState {
            phase: GamePhase::Running,
            round: 2,
            ..GameState::new(GameConfig::default())
        };
        assert_eq!(state, fresh);
        assert_eq!(state.player.pos, Vec2::new(100.0, 100.0));
        assert_eq!(state.world.scroll_offset, 0.0);
    }
}

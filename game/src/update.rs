//! The per-frame updater.
//!
//! One call to [`tick`] is one frame of a running round: queued intents, physics, horizontal
//! movement or scrolling, landing, then the end-of-round checks. Drawing is separate (see
//! `render`), so a frame here never touches a canvas.

use tracing::debug;

use crate::phase::{GamePhase, PhaseEvent};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Still,
    WalkLeft,
    WalkRight,
    ScrollLeft,
    ScrollRight,
}

/// What happened during one frame, for tests and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub movement: Movement,
    pub landed: bool,
    /// Set on the frame the round ended.
    pub outcome: Option<GamePhase>,
}

impl Default for TickReport {
    fn default() -> Self {
        Self {
            movement: Movement::Still,
            landed: false,
            outcome: None,
        }
    }
}

/// Advances a running round by one frame. Does nothing unless the phase is `Running`.
pub fn tick(state: &mut GameState) -> TickReport {
    let mut report = TickReport::default();
    if !state.phase.is_running() {
        return report;
    }
    let config = state.config;

    for intent in state.take_intents() {
        state.player.apply_intent(intent, &config);
    }

    state.player.update(&config);
    report.movement = resolve_horizontal(state);

    if state.world.landing_tile(&state.player).is_some() {
        state.player.vel.y = 0.0;
        report.landed = true;
    }

    state.ticks += 1;

    if state.world.goal_reached() {
        state.dispatch(PhaseEvent::ReachedGoal);
    }
    if state.phase.is_running() && state.player.bottom() >= config.canvas_height {
        state.dispatch(PhaseEvent::FellOut);
    }
    if !state.phase.is_running() {
        report.outcome = Some(state.phase);
    }
    report
}

/// Moves the player inside the walk zone; outside it the player stands still and the world
/// scrolls instead. Left wins when both directions are held.
fn resolve_horizontal(state: &mut GameState) -> Movement {
    let config = &state.config;
    let player = &mut state.player;
    let input = state.input;

    if input.left && player.pos.x >= config.left_walk_bound() {
        player.vel.x = -config.movement_speed;
        return Movement::WalkLeft;
    }
    if input.right && player.pos.x <= config.right_walk_bound() {
        player.vel.x = config.movement_speed;
        return Movement::WalkRight;
    }

    player.vel.x = 0.0;
    if input.left && state.world.scroll_left(config) {
        Movement::ScrollLeft
    } else if input.right {
        state.world.scroll_right(config);
        if state.world.scroll_offset % 1000.0 == 0.0 {
            debug!(scroll_offset = state.world.scroll_offset, "scroll progress");
        }
        Movement::ScrollRight
    } else {
        Movement::Still
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::input::{Key, KeyEvent};
    use crate::player::Animation;
    use crate::vec2::Vec2;

    fn running() -> GameState {
        let mut state = GameState::new(GameConfig::default());
        state.start();
        state
    }

    #[test]
    fn tick_is_a_no_op_outside_running() {
        let mut state = GameState::new(GameConfig::default());
        let before = state.clone();
        assert_eq!(tick(&mut state), TickReport::default());
        assert_eq!(state, before);
    }

    #[test]
    fn intents_apply_before_physics() {
        let mut state = running();
        state.handle_key(KeyEvent::pressed(Key::W));
        state.handle_key(KeyEvent::pressed(Key::A));
        tick(&mut state);
        assert_eq!(state.player.pos.y, 70.0);
        assert_eq!(state.player.vel.y, -28.5);
        assert_eq!(state.player.animation, Animation::LeftWalk);
        assert!(state.pending.is_empty());
    }

    #[test]
    fn walking_left_stops_at_the_left_bound() {
        let mut state = running();
        state.handle_key(KeyEvent::pressed(Key::A));
        let mut reports = Vec::new();
        for _ in 0..5 {
            reports.push(tick(&mut state).movement);
        }
        // 100 < 102.4, so the player never walks and the world is already at the start.
        assert!(reports.iter().all(|m| *m == Movement::Still));
        assert_eq!(state.player.pos.x, 100.0);
    }

    #[test]
    fn resting_on_a_platform_keeps_vertical_speed_at_zero() {
        let mut state = running();
        state.player.pos = Vec2::new(300.0, 457.0 - state.player.height);
        for _ in 0..10 {
            let report = tick(&mut state);
            assert!(report.landed);
            assert_eq!(state.player.vel.y, 0.0);
        }
        assert_eq!(state.player.bottom(), 457.0);
        assert!(state.phase.is_running());
    }

    #[test]
    fn falling_to_the_floor_loses_once() {
        let mut state = running();
        state.player.pos = Vec2::new(960.0, 560.0 - state.player.height);
        state.player.vel.y = 20.0;
        let report = tick(&mut state);
        assert_eq!(report.outcome, Some(GamePhase::Lost));
        assert_eq!(state.phase, GamePhase::Lost);

        assert_eq!(tick(&mut state), TickReport::default());
        assert_eq!(state.phase, GamePhase::Lost);
    }

    #[test]
    fn win_takes_precedence_over_falling_out_on_the_same_frame() {
        let mut state = running();
        state.world.scroll_offset = state.world.max_limit;
        state.player.pos.y = 600.0;
        assert_eq!(tick(&mut state).outcome, Some(GamePhase::Won));
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn holding_left_scrolls_back_only_while_offset_is_positive() {
        let mut state = running();
        state.player.pos.x = 50.0;
        let config = state.config;
        state.world.scroll_right(&config);
        state.handle_key(KeyEvent::pressed(Key::ArrowLeft));
        assert_eq!(tick(&mut state).movement, Movement::ScrollLeft);
        assert_eq!(state.world.scroll_offset, 0.0);
        assert_eq!(tick(&mut state).movement, Movement::Still);
    }
}

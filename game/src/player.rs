use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::input::Intent;
use crate::vec2::Vec2;

/// Which way the player faces and whether the walk cycle plays.
///
/// A single enum field means exactly one state is active at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    #[default]
    RightIdle,
    LeftIdle,
    RightWalk,
    LeftWalk,
}

impl Animation {
    /// Transition for one intent. Intents that don't concern facing leave the state alone.
    pub fn apply(self, intent: Intent) -> Self {
        match intent {
            Intent::MoveLeft => Animation::LeftWalk,
            Intent::StopLeft => Animation::LeftIdle,
            Intent::MoveRight => Animation::RightWalk,
            Intent::StopRight => Animation::RightIdle,
            Intent::Jump | Intent::StopJump | Intent::Confirm => self,
        }
    }

    /// Top-left corner of this state's sprite-sheet cell for walk frame `frame`.
    ///
    /// Idle states use a single cell, so the frame counter has no visible effect on them.
    /// The left-facing row runs right to left.
    pub fn sheet_origin(self, frame: u8, config: &GameConfig) -> (f32, f32) {
        let fw = config.sprite_frame_width;
        let last = (config.walk_cycle_frames.max(1) - 1) as f32;
        let f = frame as f32;
        match self {
            Animation::RightIdle => (0.0, 0.0),
            Animation::LeftIdle => (fw * last, config.sprite_left_row_y),
            Animation::RightWalk => (fw * f, 0.0),
            Animation::LeftWalk => (fw * last - fw * f, config.sprite_left_row_y),
        }
    }

    pub fn faces_left(self) -> bool {
        matches!(self, Animation::LeftIdle | Animation::LeftWalk)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub animation: Animation,
    /// Walk-cycle counter, always below `GameConfig::walk_cycle_frames`.
    pub frame: u8,
    /// Cell shown for this state: the counter as it was before the last advance.
    pub shown_frame: u8,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: config.player_start,
            vel: Vec2::ZERO,
            width: config.player_width,
            height: config.player_height,
            animation: Animation::default(),
            frame: 0,
            shown_frame: 0,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Where the bottom edge lands after the current vertical velocity is applied.
    pub fn next_bottom(&self) -> f32 {
        self.bottom() + self.vel.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    /// Applies one queued intent: facing changes and the jump impulse.
    ///
    /// A jump while already above the top edge of the canvas is damped back to zero net
    /// impulse; it doesn't clamp position. Releasing up kills vertical speed outright.
    pub fn apply_intent(&mut self, intent: Intent, config: &GameConfig) {
        match intent {
            Intent::Jump => {
                self.vel.y = -config.jump_impulse;
                if self.pos.y < 0.0 {
                    self.vel.y += config.jump_impulse;
                }
            }
            Intent::StopJump => self.vel.y = 0.0,
            _ => self.animation = self.animation.apply(intent),
        }
    }

    /// One physics step: show the current walk cell and advance the cycle, move by velocity,
    /// then accelerate downward.
    pub fn update(&mut self, config: &GameConfig) {
        self.shown_frame = self.frame;
        self.frame = (self.frame + 1) % config.walk_cycle_frames.max(1);
        self.pos += self.vel;
        self.vel.y += config.gravity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn new_player_starts_idle_at_spawn() {
        let p = Player::new(&config());
        assert_eq!(p.pos, Vec2::new(100.0, 100.0));
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.animation, Animation::RightIdle);
        assert_eq!(p.frame, 0);
        assert_eq!(p.bottom(), 165.0);
    }

    #[test]
    fn animation_transitions_follow_direction_intents() {
        let a = Animation::RightIdle;
        assert_eq!(a.apply(Intent::MoveLeft), Animation::LeftWalk);
        assert_eq!(a.apply(Intent::MoveLeft).apply(Intent::StopLeft), Animation::LeftIdle);
        assert_eq!(Animation::LeftIdle.apply(Intent::MoveRight), Animation::RightWalk);
        assert_eq!(Animation::LeftWalk.apply(Intent::StopRight), Animation::RightIdle);
        assert_eq!(Animation::LeftWalk.apply(Intent::Jump), Animation::LeftWalk);
        assert_eq!(Animation::LeftWalk.apply(Intent::Confirm), Animation::LeftWalk);
    }

    #[test]
    fn frame_counter_wraps_after_a_full_cycle() {
        let c = config();
        let mut p = Player::new(&c);
        for expected in (1..8).chain([0]) {
            p.update(&c);
            assert_eq!(p.frame, expected);
        }
    }

    #[test]
    fn shown_frame_lags_the_counter_by_one_update() {
        let c = config();
        let mut p = Player::new(&c);
        let shown: Vec<u8> = (0..9)
            .map(|_| {
                p.update(&c);
                p.shown_frame
            })
            .collect();
        assert_eq!(shown, vec![0, 1, 2, 3, 4, 5, 6, 7, 0]);
    }

    #[test]
    fn update_moves_then_applies_gravity() {
        let c = config();
        let mut p = Player::new(&c);
        p.vel = Vec2::new(5.0, 2.0);
        p.update(&c);
        assert_eq!(p.pos, Vec2::new(105.0, 102.0));
        assert_eq!(p.vel, Vec2::new(5.0, 3.5));
    }

    #[test]
    fn jump_sets_upward_impulse_and_release_kills_it() {
        let c = config();
        let mut p = Player::new(&c);
        p.apply_intent(Intent::Jump, &c);
        assert_eq!(p.vel.y, -30.0);
        p.apply_intent(Intent::StopJump, &c);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn jump_above_the_canvas_top_nets_zero_impulse() {
        let c = config();
        let mut p = Player::new(&c);
        p.pos.y = -4.0;
        p.vel.y = 7.0;
        p.apply_intent(Intent::Jump, &c);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn sheet_origins_match_sprite_layout() {
        let c = config();
        assert_eq!(Animation::RightIdle.sheet_origin(5, &c), (0.0, 0.0));
        assert_eq!(Animation::LeftIdle.sheet_origin(5, &c), (756.0, 140.0));
        assert_eq!(Animation::RightWalk.sheet_origin(3, &c), (324.0, 0.0));
        assert_eq!(Animation::LeftWalk.sheet_origin(0, &c), (756.0, 140.0));
        assert_eq!(Animation::LeftWalk.sheet_origin(7, &c), (0.0, 140.0));
    }
}

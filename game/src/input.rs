//! Keyboard state tracking.
//!
//! Raw key transitions go in, discrete [`Intent`]s come out. Intents are queued on the game
//! state and applied once at the start of the next frame, so nothing here touches physics.

use serde::{Deserialize, Serialize};

/// Physical keys the game distinguishes. Two keys map to each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowLeft,
    ArrowDown,
    ArrowRight,
    Enter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::W | Key::ArrowUp => Some(Direction::Up),
            Key::A | Key::ArrowLeft => Some(Direction::Left),
            Key::S | Key::ArrowDown => Some(Direction::Down),
            Key::D | Key::ArrowRight => Some(Direction::Right),
            Key::Enter | Key::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

impl KeyEvent {
    pub const fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    pub const fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
        }
    }

    pub fn is_confirm(&self) -> bool {
        self.key == Key::Enter && self.state == KeyState::Pressed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Jump,
    StopJump,
    MoveLeft,
    StopLeft,
    MoveRight,
    StopRight,
    Confirm,
}

/// Pressed/released state of the four directions.
///
/// Left and right may both read as pressed; the frame updater decides which one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTracker {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

impl InputTracker {
    pub fn is_pressed(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Right => self.right,
        }
    }

    /// Records the transition and returns the intent it produces, if any.
    ///
    /// Repeated presses (OS key repeat) produce the intent again.
    pub fn handle(&mut self, event: KeyEvent) -> Option<Intent> {
        let pressed = event.state == KeyState::Pressed;
        let Some(dir) = event.key.direction() else {
            return event.is_confirm().then_some(Intent::Confirm);
        };

        match dir {
            Direction::Up => {
                self.up = pressed;
                Some(if pressed { Intent::Jump } else { Intent::StopJump })
            }
            Direction::Left => {
                self.left = pressed;
                Some(if pressed { Intent::MoveLeft } else { Intent::StopLeft })
            }
            Direction::Right => {
                self.right = pressed;
                Some(if pressed { Intent::MoveRight } else { Intent::StopRight })
            }
            Direction::Down => {
                self.down = pressed;
                None
            }
        }
    }
}

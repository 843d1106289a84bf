use winit::event::{ElementState, VirtualKeyCode};

use crate::input::{Key, KeyEvent, KeyState};

pub fn map_key(key: VirtualKeyCode) -> Key {
    match key {
        VirtualKeyCode::W => Key::W,
        VirtualKeyCode::A => Key::A,
        VirtualKeyCode::S => Key::S,
        VirtualKeyCode::D => Key::D,
        VirtualKeyCode::Up => Key::ArrowUp,
        VirtualKeyCode::Left => Key::ArrowLeft,
        VirtualKeyCode::Down => Key::ArrowDown,
        VirtualKeyCode::Right => Key::ArrowRight,
        VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => Key::Enter,
        _ => Key::Other,
    }
}

pub fn map_key_event(key: VirtualKeyCode, state: ElementState) -> KeyEvent {
    KeyEvent {
        key: map_key(key),
        state: match state {
            ElementState::Pressed => KeyState::Pressed,
            ElementState::Released => KeyState::Released,
        },
    }
}

//! Translation from winit's physical keys and buttons to the runtime's own
//! input vocabulary. Anything unmapped is dropped before it reaches the core.

use curb_core::input::{Key, MouseBtn};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

pub fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Key::Shift),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

pub fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_shift_keys_mean_run() {
        assert_eq!(map_key(KeyCode::ShiftLeft), Some(Key::Shift));
        assert_eq!(map_key(KeyCode::ShiftRight), Some(Key::Shift));
    }

    #[test]
    fn menu_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::Enter), Some(Key::Enter));
        assert_eq!(map_key(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::ArrowDown), Some(Key::Down));
    }

    #[test]
    fn unrelated_keys_are_dropped() {
        assert_eq!(map_key(KeyCode::KeyQ), None);
        assert_eq!(map_key(KeyCode::F12), None);
        assert_eq!(map_mouse_button(MouseButton::Back), None);
    }

    #[test]
    fn mouse_buttons_map_one_to_one() {
        assert_eq!(map_mouse_button(MouseButton::Left), Some(MouseBtn::Left));
        assert_eq!(map_mouse_button(MouseButton::Right), Some(MouseBtn::Right));
        assert_eq!(map_mouse_button(MouseButton::Middle), Some(MouseBtn::Middle));
    }
}

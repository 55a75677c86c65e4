//! Per-tick frame snapshot and the context handed to every subscriber.
//!
//! Subscribers never mutate shared state directly. Screen switches, settings
//! changes, character selection and quitting are queued as [`FrameRequest`]s
//! and applied by the director at the frame boundary, after both phases have
//! finished iterating.

use std::collections::HashSet;

use glam::Vec2;

use crate::input::{Key, KeyEvent, KeyTransition, MouseBtn};
use crate::settings::{GameState, SettingsPatch};

/// Immutable input snapshot for one tick.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub dt: f32,
    pub key_event: Option<KeyEvent>,
    pub held: HashSet<Key>,
    pub pressed: HashSet<Key>,
    pub mouse_position: Vec2,
    pub mouse_buttons: [bool; 3],
    pub mouse_clicked: [bool; 3],
}

impl FrameInput {
    /// A tick with no input at all.
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    pub fn holding(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    /// Key went down this tick (also counts as held).
    pub fn pressing(mut self, key: Key) -> Self {
        self.held.insert(key);
        self.pressed.insert(key);
        self.key_event = Some(KeyEvent {
            key,
            kind: KeyTransition::Pressed,
        });
        self
    }

    pub fn with_mouse(mut self, position: Vec2) -> Self {
        self.mouse_position = position;
        self
    }

    pub fn clicking(mut self, btn: MouseBtn) -> Self {
        self.mouse_buttons[btn.index()] = true;
        self.mouse_clicked[btn.index()] = true;
        self
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_buttons[btn.index()]
    }

    pub fn is_mouse_clicked(&self, btn: MouseBtn) -> bool {
        self.mouse_clicked[btn.index()]
    }

    /// -1, 0 or 1 from the Left/Right keys.
    pub fn horizontal_axis(&self) -> f32 {
        axis(self.is_held(Key::Left), self.is_held(Key::Right))
    }

    /// -1, 0 or 1 from the Up/Down keys (screen space, y grows downward).
    pub fn vertical_axis(&self) -> f32 {
        axis(self.is_held(Key::Up), self.is_held(Key::Down))
    }
}

fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Deferred mutation requested by a subscriber during dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameRequest {
    SwitchScreen(String),
    UpdateSettings(SettingsPatch),
    SelectCharacter(String),
    Quit,
}

pub struct FrameContext<'a> {
    pub input: &'a FrameInput,
    pub game: &'a GameState,
    requests: &'a mut Vec<FrameRequest>,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        input: &'a FrameInput,
        game: &'a GameState,
        requests: &'a mut Vec<FrameRequest>,
    ) -> Self {
        Self {
            input,
            game,
            requests,
        }
    }

    pub fn dt(&self) -> f32 {
        self.input.dt
    }

    pub fn request(&mut self, request: FrameRequest) {
        self.requests.push(request);
    }

    pub fn switch_screen(&mut self, screen: impl Into<String>) {
        self.request(FrameRequest::SwitchScreen(screen.into()));
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.request(FrameRequest::UpdateSettings(patch));
    }

    pub fn select_character(&mut self, id: impl Into<String>) {
        self.request(FrameRequest::SelectCharacter(id.into()));
    }

    pub fn quit(&mut self) {
        self.request(FrameRequest::Quit);
    }

    pub fn pending_requests(&self) -> &[FrameRequest] {
        self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_cancel_when_both_held() {
        let frame = FrameInput::idle(0.0)
            .holding(Key::Left)
            .holding(Key::Right);
        assert_eq!(frame.horizontal_axis(), 0.0);
        let frame = FrameInput::idle(0.0).holding(Key::Up);
        assert_eq!(frame.vertical_axis(), -1.0);
    }

    #[test]
    fn context_queues_requests_in_order() {
        let input = FrameInput::idle(0.0);
        let game = GameState::default();
        let mut requests = Vec::new();
        let mut ctx = FrameContext::new(&input, &game, &mut requests);
        ctx.switch_screen("settings");
        ctx.quit();
        assert_eq!(ctx.pending_requests().len(), 2);
        assert_eq!(
            requests,
            vec![
                FrameRequest::SwitchScreen("settings".to_string()),
                FrameRequest::Quit
            ]
        );
    }
}

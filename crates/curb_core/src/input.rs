//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every tick the key is
//!   physically down. Movement and the run modifier read this.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only for the frame
//!   the transition happened. Menus, jumps and confirmations read this.
//!   `end_frame()` clears them; the main loop only calls it after at least one
//!   tick consumed the frame, so a press landing on a zero-tick frame survives.
//!
//! [`InputState::snapshot`] freezes the current state into the per-tick
//! [`FrameInput`] handed to every subscriber.

use std::collections::HashSet;

use glam::Vec2;
use serde::Deserialize;

use crate::frame::FrameInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    Space,
    Shift,
    F3,
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

impl MouseBtn {
    pub const ALL: [MouseBtn; 3] = [MouseBtn::Left, MouseBtn::Right, MouseBtn::Middle];

    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Pressed,
    Released,
}

/// The most recent key transition seen during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub kind: KeyTransition,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
    last_event: Option<KeyEvent>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,
    mouse_just_released: HashSet<MouseBtn>,

    pub mouse_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            last_event: None,
            mouse_held: HashSet::new(),
            mouse_just_pressed: HashSet::new(),
            mouse_just_released: HashSet::new(),
            mouse_position: Vec2::ZERO,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
            self.last_event = Some(KeyEvent {
                key,
                kind: KeyTransition::Pressed,
            });
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
            self.last_event = Some(KeyEvent {
                key,
                kind: KeyTransition::Released,
            });
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        if self.mouse_held.remove(&btn) {
            self.mouse_just_released.insert(btn);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    pub fn is_mouse_just_released(&self, btn: MouseBtn) -> bool {
        self.mouse_just_released.contains(&btn)
    }

    /// Freeze the current state into the snapshot passed to subscribers.
    pub fn snapshot(&self, dt: f32) -> FrameInput {
        let mut mouse_buttons = [false; 3];
        let mut mouse_clicked = [false; 3];
        for btn in MouseBtn::ALL {
            mouse_buttons[btn.index()] = self.mouse_held.contains(&btn);
            mouse_clicked[btn.index()] = self.mouse_just_pressed.contains(&btn);
        }
        FrameInput {
            dt,
            key_event: self.last_event,
            held: self.held.clone(),
            pressed: self.just_pressed.clone(),
            mouse_position: self.mouse_position,
            mouse_buttons,
            mouse_clicked,
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.last_event = None;
        self.mouse_just_pressed.clear();
        self.mouse_just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

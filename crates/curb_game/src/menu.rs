//! Vertical option list shared by the menu screens: keyboard navigation,
//! mouse hover and click, and the drawing that records hit boxes.

use curb_core::canvas::{Canvas, Color, Rect, TextAlign};
use curb_core::frame::FrameInput;
use curb_core::input::{Key, MouseBtn};
use glam::Vec2;

/// Ticks after a mouse activation during which further clicks are ignored.
pub const CLICK_COOLDOWN_TICKS: u32 = 2;
pub const OPTION_SPACING: f32 = 60.0;
pub const OPTION_TEXT_SIZE: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct MenuList {
    len: usize,
    selected: usize,
    cooldown: u32,
    top_center: Vec2,
    hitboxes: Vec<Rect>,
}

impl MenuList {
    pub fn new(len: usize, top_center: Vec2) -> Self {
        Self {
            len,
            selected: 0,
            cooldown: 0,
            top_center,
            hitboxes: Vec::new(),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.selected = index;
        }
    }

    fn hovered(&self, point: Vec2) -> Option<usize> {
        self.hitboxes.iter().position(|r| r.contains(point))
    }

    /// Apply one tick of input. Returns the option activated this tick, if any.
    /// Hit boxes come from the last `draw`, so the mouse only works once the
    /// list has been drawn.
    pub fn handle(&mut self, input: &FrameInput) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let mut activated = None;
        if input.is_pressed(Key::Down) {
            self.selected = (self.selected + 1) % self.len;
        } else if input.is_pressed(Key::Up) {
            self.selected = (self.selected + self.len - 1) % self.len;
        } else if input.is_pressed(Key::Enter) {
            activated = Some(self.selected);
        }

        if let Some(index) = self.hovered(input.mouse_position) {
            self.selected = index;
            if activated.is_none() && input.is_mouse_clicked(MouseBtn::Left) && self.cooldown == 0 {
                self.cooldown = CLICK_COOLDOWN_TICKS;
                activated = Some(index);
            }
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        activated
    }

    /// Draw each label centered on its row; the selected one in yellow.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, labels: &[String]) {
        self.hitboxes.clear();
        for (i, label) in labels.iter().enumerate() {
            let color = if i == self.selected {
                Color::YELLOW
            } else {
                Color::WHITE
            };
            let anchor = self.top_center + Vec2::new(0.0, i as f32 * OPTION_SPACING);
            let bounds = canvas.draw_text(label, anchor, OPTION_TEXT_SIZE, color, TextAlign::Center);
            self.hitboxes.push(bounds);
        }
    }
}

/// Localised text with a fallback for keys the locale file lacks.
pub fn label_or(text: &str, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}

use glam::Vec2;

use crate::animation_handler::{AnimationHandler, IDLE, MOVE};

pub const DEFAULT_LIFETIME_TICKS: u32 = 300;

/// Constant-speed traffic that drifts with the street scroll and expires
/// after a fixed number of ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleMotion {
    pub velocity_x: f32,
    pub lifetime_ticks: u32,
    age_ticks: u32,
}

impl VehicleMotion {
    pub fn new(velocity_x: f32, lifetime_ticks: u32) -> Self {
        Self {
            velocity_x,
            lifetime_ticks,
            age_ticks: 0,
        }
    }

    /// `scroll_dx` is the scene's parallax offset for this tick.
    pub fn tick(&mut self, position: &mut Vec2, animations: &mut AnimationHandler, scroll_dx: f32) {
        position.x += self.velocity_x + scroll_dx;
        self.age_ticks = self.age_ticks.saturating_add(1);
        animations.set_animation(if self.velocity_x != 0.0 { MOVE } else { IDLE });
    }

    pub fn age_ticks(&self) -> u32 {
        self.age_ticks
    }

    pub fn is_expired(&self) -> bool {
        self.age_ticks >= self.lifetime_ticks
    }
}

impl Default for VehicleMotion {
    fn default() -> Self {
        Self::new(-2.0, DEFAULT_LIFETIME_TICKS)
    }
}

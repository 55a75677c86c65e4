//! Player-style locomotion: ramped horizontal speed, a run modifier, a
//! parabolic jump and the animation state that follows from them.
//!
//! All quantities are per tick (pixels per tick, pixels per tick squared),
//! not per second. The jump arc is integrated here and never by the gravity
//! component, so `landing_y` alone decides when a jump ends.

use glam::Vec2;

use crate::animation_handler::{AnimationHandler, DODGE, FALL, IDLE, JUMP, RUN, WALK};
use crate::frame::FrameInput;
use crate::input::Key;

/// Fall speed above which a grounded gravity body shows its fall animation.
pub const FALL_THRESHOLD: f32 = 2.0;

/// Which horizontal direction mirrors the sprite. Sheets are drawn facing
/// either way, so each character states its own convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipWhen {
    #[default]
    MovingLeft,
    MovingRight,
}

impl FlipWhen {
    fn flipped_for(self, dx: f32) -> bool {
        match self {
            Self::MovingLeft => dx < 0.0,
            Self::MovingRight => dx > 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterConfig {
    pub walk_speed: f32,
    pub run_multiplier: f32,
    /// Per-tick change of horizontal speed while ramping.
    pub acceleration: f32,
    pub jump_force: f32,
    pub jump_gravity: f32,
    pub jump_cooldown_ticks: u32,
    pub min_y: f32,
    pub max_y: f32,
    /// Up/Down walk along the street instead of being ignored.
    pub free_roam: bool,
    pub flip: FlipWhen,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_multiplier: 2.0,
            acceleration: 0.5,
            jump_force: 12.0,
            jump_gravity: 0.5,
            jump_cooldown_ticks: 10,
            min_y: f32::NEG_INFINITY,
            max_y: f32::INFINITY,
            free_roam: false,
            flip: FlipWhen::MovingLeft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpState {
    #[default]
    Grounded,
    Jumping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterMotion {
    pub config: CharacterConfig,
    /// Reads the frame input when true; otherwise the character only coasts.
    pub controlled: bool,
    velocity_x: f32,
    velocity_y: f32,
    jump: JumpState,
    jump_velocity: f32,
    jump_cooldown: u32,
    landing_y: f32,
    flipped: bool,
}

impl CharacterMotion {
    pub fn new(config: CharacterConfig) -> Self {
        Self {
            config,
            controlled: false,
            velocity_x: 0.0,
            velocity_y: 0.0,
            jump: JumpState::Grounded,
            jump_velocity: 0.0,
            jump_cooldown: 0,
            landing_y: 0.0,
            flipped: false,
        }
    }

    pub fn controlled(mut self) -> Self {
        self.controlled = true;
        self
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.velocity_x, self.velocity_y)
    }

    /// Magnitude fed to velocity-scaled animations. The arc counts while
    /// airborne so a standing jump still animates.
    pub fn speed_factor(&self) -> f32 {
        let ground = self.velocity_x.abs().max(self.velocity_y.abs());
        if self.is_jumping() {
            ground.max(self.jump_velocity.abs())
        } else {
            ground
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jump == JumpState::Jumping
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    pub fn landing_y(&self) -> f32 {
        self.landing_y
    }

    pub fn jump_velocity(&self) -> f32 {
        self.jump_velocity
    }

    pub fn jump_cooldown(&self) -> u32 {
        self.jump_cooldown
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// One tick of locomotion. `falling` tells whether an external gravity
    /// component is currently pulling the body down.
    pub fn tick(
        &mut self,
        input: &FrameInput,
        position: &mut Vec2,
        animations: &mut AnimationHandler,
        falling: bool,
    ) {
        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);

        let (axis_x, axis_y, run, jump, dodge) = if self.controlled {
            (
                input.horizontal_axis(),
                if self.config.free_roam {
                    input.vertical_axis()
                } else {
                    0.0
                },
                input.is_held(Key::Shift),
                input.is_held(Key::Space),
                !self.config.free_roam && input.is_pressed(Key::Down),
            )
        } else {
            (0.0, 0.0, false, false, false)
        };

        if jump && !falling {
            self.start_jump(position.y);
        }
        if dodge && !self.is_jumping() {
            animations.set_animation(DODGE);
        }
        self.step_jump(position);

        let cap = if run {
            self.config.walk_speed * self.config.run_multiplier
        } else {
            self.config.walk_speed
        };
        self.velocity_x = move_towards(self.velocity_x, axis_x * cap, self.config.acceleration);
        let dy = axis_y * self.config.walk_speed;
        self.move_by(position, animations, self.velocity_x, dy, falling);
    }

    /// Grounded to Jumping. Ignored while airborne or cooling down.
    pub fn start_jump(&mut self, current_y: f32) -> bool {
        if self.is_jumping() || self.jump_cooldown > 0 {
            return false;
        }
        self.jump = JumpState::Jumping;
        self.jump_velocity = -self.config.jump_force;
        self.landing_y = current_y;
        true
    }

    /// Integrate the arc for one tick; lands exactly on `landing_y`.
    pub fn step_jump(&mut self, position: &mut Vec2) {
        if !self.is_jumping() {
            return;
        }
        self.jump_velocity += self.config.jump_gravity;
        position.y += self.jump_velocity;
        if position.y >= self.landing_y {
            position.y = self.landing_y;
            self.jump_velocity = 0.0;
            self.jump = JumpState::Grounded;
            self.jump_cooldown = self.config.jump_cooldown_ticks;
        }
    }

    /// Apply a horizontal step and a vertical nudge, then pick the animation.
    pub fn move_by(
        &mut self,
        position: &mut Vec2,
        animations: &mut AnimationHandler,
        dx: f32,
        dy: f32,
        falling: bool,
    ) {
        self.velocity_x = dx;
        self.velocity_y = dy * 0.5;
        position.x += dx;

        if !self.is_jumping() {
            let before = position.y;
            position.y = (position.y + self.velocity_y)
                .max(self.config.min_y)
                .min(self.config.max_y);
            self.landing_y += position.y - before;
        }

        if dx != 0.0 {
            self.flipped = self.config.flip.flipped_for(dx);
        }
        self.select_animation(animations, falling);
        animations.set_flipped(self.flipped);
    }

    fn select_animation(&self, animations: &mut AnimationHandler, falling: bool) {
        let state = if self.is_jumping() {
            JUMP
        } else if falling && animations.has(FALL) {
            FALL
        } else if animations.current_name() == DODGE && !animations.current().is_finished() {
            return;
        } else if self.velocity_x.abs() > self.config.walk_speed {
            RUN
        } else if self.velocity_x != 0.0 || self.velocity_y != 0.0 {
            WALK
        } else {
            IDLE
        };
        animations.set_animation(state);
    }

    /// Place the body at rest on `y`, e.g. when spawning onto the ground.
    pub fn settle_at(&mut self, y: f32) {
        self.jump = JumpState::Grounded;
        self.jump_velocity = 0.0;
        self.landing_y = y;
    }
}

pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else if target > current {
        current + max_delta
    } else {
        current - max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::sprite::SpriteFrame;
    use std::collections::HashMap;

    fn handler(states: &[&str]) -> AnimationHandler {
        let map = states
            .iter()
            .map(|name| {
                let looping = *name != DODGE;
                let frames = vec![SpriteFrame::solid(2, 2, [1; 4]); 3];
                (name.to_string(), Animation::new(frames, looping, true).unwrap())
            })
            .collect::<HashMap<_, _>>();
        AnimationHandler::new(map, IDLE).unwrap()
    }

    fn full_handler() -> AnimationHandler {
        handler(&[IDLE, WALK, RUN, JUMP, FALL, DODGE])
    }

    #[test]
    fn jump_arc_returns_exactly_to_landing_y() {
        let config = CharacterConfig {
            jump_force: 12.0,
            jump_gravity: 0.5,
            ..CharacterConfig::default()
        };
        let mut motion = CharacterMotion::new(config);
        let mut position = Vec2::new(0.0, 500.0);
        assert!(motion.start_jump(position.y));

        let mut ticks = 0;
        let mut peak = position.y;
        while motion.is_jumping() {
            motion.step_jump(&mut position);
            peak = peak.min(position.y);
            ticks += 1;
            assert!(ticks < 1000, "jump never closed");
        }
        assert_eq!(position.y, 500.0);
        assert_eq!(motion.jump_velocity(), 0.0);
        assert!(peak < 500.0 - 100.0);
        // y_k - L = -12k + 0.25k(k+1) >= 0 first holds at k = 47
        assert_eq!(ticks, 47);
    }

    #[test]
    fn cooldown_blocks_immediate_rejump() {
        let mut motion = CharacterMotion::new(CharacterConfig::default());
        let mut position = Vec2::new(0.0, 0.0);
        motion.start_jump(0.0);
        while motion.is_jumping() {
            motion.step_jump(&mut position);
        }
        assert_eq!(motion.jump_cooldown(), 10);
        assert!(!motion.start_jump(0.0));
    }

    #[test]
    fn held_space_jumps_again_after_cooldown() {
        let mut motion = CharacterMotion::new(CharacterConfig::default()).controlled();
        let mut animations = full_handler();
        let mut position = Vec2::new(0.0, 300.0);
        let input = FrameInput::idle(1.0 / 60.0).holding(Key::Space);

        let mut takeoffs = 0;
        let mut was_jumping = false;
        for _ in 0..200 {
            motion.tick(&input, &mut position, &mut animations, false);
            if motion.is_jumping() && !was_jumping {
                takeoffs += 1;
            }
            was_jumping = motion.is_jumping();
            assert!(position.y <= 300.0);
        }
        // 47 airborne ticks, then 9 grounded ticks while the cooldown drains
        assert_eq!(takeoffs, 4);
    }

    #[test]
    fn speed_ramps_toward_walk_then_run() {
        let mut motion = CharacterMotion::new(CharacterConfig::default()).controlled();
        let mut animations = full_handler();
        let mut position = Vec2::ZERO;
        let right = FrameInput::idle(0.0).holding(Key::Right);

        motion.tick(&right, &mut position, &mut animations, false);
        assert_eq!(motion.velocity().x, 0.5);
        assert_eq!(animations.current_name(), WALK);

        for _ in 0..20 {
            motion.tick(&right, &mut position, &mut animations, false);
        }
        assert_eq!(motion.velocity().x, 5.0);
        assert_eq!(animations.current_name(), WALK);

        let running = right.clone().holding(Key::Shift);
        for _ in 0..20 {
            motion.tick(&running, &mut position, &mut animations, false);
        }
        assert_eq!(motion.velocity().x, 10.0);
        assert_eq!(animations.current_name(), RUN);

        let idle = FrameInput::idle(0.0);
        for _ in 0..30 {
            motion.tick(&idle, &mut position, &mut animations, false);
        }
        assert_eq!(motion.velocity().x, 0.0);
        assert_eq!(animations.current_name(), IDLE);
    }

    #[test]
    fn jump_animation_overrides_locomotion() {
        let mut motion = CharacterMotion::new(CharacterConfig::default()).controlled();
        let mut animations = full_handler();
        let mut position = Vec2::new(0.0, 100.0);
        let input = FrameInput::idle(0.0).holding(Key::Right).holding(Key::Space);
        motion.tick(&input, &mut position, &mut animations, false);
        assert!(motion.is_jumping());
        assert_eq!(animations.current_name(), JUMP);
    }

    #[test]
    fn flip_convention_is_per_character() {
        let mut left_flips = CharacterMotion::new(CharacterConfig::default());
        let mut right_flips = CharacterMotion::new(CharacterConfig {
            flip: FlipWhen::MovingRight,
            ..CharacterConfig::default()
        });
        let mut a = full_handler();
        let mut b = full_handler();
        let mut position = Vec2::ZERO;

        left_flips.move_by(&mut position, &mut a, -3.0, 0.0, false);
        right_flips.move_by(&mut position, &mut b, -3.0, 0.0, false);
        assert!(a.is_flipped());
        assert!(!b.is_flipped());

        // standing still keeps the last facing
        left_flips.move_by(&mut position, &mut a, 0.0, 0.0, false);
        assert!(a.is_flipped());
        assert!(a.sprite().flipped);
    }

    #[test]
    fn standing_jump_has_animation_speed() {
        let mut motion = CharacterMotion::new(CharacterConfig::default());
        assert_eq!(motion.speed_factor(), 0.0);
        motion.start_jump(0.0);
        assert_eq!(motion.speed_factor(), 12.0);

        let mut position = Vec2::ZERO;
        while motion.is_jumping() {
            motion.step_jump(&mut position);
        }
        assert_eq!(motion.speed_factor(), 0.0);
    }

    #[test]
    fn free_roam_moves_half_dy_within_bounds_and_tracks_landing() {
        let config = CharacterConfig {
            free_roam: true,
            min_y: 100.0,
            max_y: 110.0,
            ..CharacterConfig::default()
        };
        let mut motion = CharacterMotion::new(config).controlled();
        motion.settle_at(104.0);
        let mut animations = handler(&[IDLE, WALK, RUN]);
        let mut position = Vec2::new(0.0, 104.0);
        let down = FrameInput::idle(0.0).holding(Key::Down);

        motion.tick(&down, &mut position, &mut animations, false);
        assert_eq!(position.y, 106.5);
        assert_eq!(motion.landing_y(), 106.5);
        assert_eq!(animations.current_name(), WALK);

        for _ in 0..5 {
            motion.tick(&down, &mut position, &mut animations, false);
        }
        assert_eq!(position.y, 110.0);
        assert_eq!(motion.landing_y(), 110.0);
    }

    #[test]
    fn dodge_plays_once_then_returns_to_idle() {
        let mut motion = CharacterMotion::new(CharacterConfig::default()).controlled();
        let mut animations = full_handler();
        let mut position = Vec2::ZERO;
        let press = FrameInput::idle(0.0).pressing(Key::Down);
        motion.tick(&press, &mut position, &mut animations, false);
        assert_eq!(animations.current_name(), DODGE);

        let idle = FrameInput::idle(0.0);
        motion.tick(&idle, &mut position, &mut animations, false);
        assert_eq!(animations.current_name(), DODGE, "one-shot keeps playing");

        animations.update_state(1.0);
        animations.update_state(1.0);
        assert!(animations.current().is_finished());
        motion.tick(&idle, &mut position, &mut animations, false);
        assert_eq!(animations.current_name(), IDLE);
    }

    #[test]
    fn falling_body_shows_fall() {
        let mut motion = CharacterMotion::new(CharacterConfig::default());
        let mut animations = full_handler();
        let mut position = Vec2::ZERO;
        motion.tick(&FrameInput::idle(0.0), &mut position, &mut animations, true);
        assert_eq!(animations.current_name(), FALL);
    }

    #[test]
    fn uncontrolled_character_ignores_input() {
        let mut motion = CharacterMotion::new(CharacterConfig::default());
        let mut animations = full_handler();
        let mut position = Vec2::ZERO;
        let input = FrameInput::idle(0.0).holding(Key::Right).holding(Key::Space);
        motion.tick(&input, &mut position, &mut animations, false);
        assert_eq!(position, Vec2::ZERO);
        assert!(!motion.is_jumping());
    }
}

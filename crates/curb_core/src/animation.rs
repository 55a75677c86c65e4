//! Frame-sequence animation.
//!
//! Time is an abstract accumulator compared against `speed`, a frame-advance
//! threshold. Fixed-rate animations add [`FIXED_INCREMENT`] per update;
//! velocity-scaled ones add the owner's speed, so a walk cycle keeps pace
//! with the feet.

use crate::error::{Result, RuntimeError};
use crate::sprite::{normalize_frames, SpriteFrame, SpriteRef};

pub const FIXED_INCREMENT: f32 = 0.05;
pub const MIN_SPEED: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<SpriteFrame>,
    looping: bool,
    uses_velocity_scaling: bool,
    speed: f32,
    current_frame: usize,
    time: f32,
    flipped: bool,
}

impl Animation {
    /// Frames are normalized to a shared bounding box so switching between
    /// them never shifts the silhouette. Zero frames is a configuration error.
    pub fn new(
        frames: Vec<SpriteFrame>,
        looping: bool,
        uses_velocity_scaling: bool,
    ) -> Result<Self> {
        if frames.is_empty() {
            return Err(RuntimeError::EmptyAnimation);
        }
        Ok(Self {
            frames: normalize_frames(frames),
            looping,
            uses_velocity_scaling,
            speed: MIN_SPEED,
            current_frame: 0,
            time: 0.0,
            flipped: false,
        })
    }

    pub fn looping(frames: Vec<SpriteFrame>) -> Result<Self> {
        Self::new(frames, true, false)
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn update(&mut self, velocity: f32) {
        let last = self.frames.len() - 1;
        if self.current_frame >= last && !self.looping {
            return;
        }

        self.time += if self.uses_velocity_scaling {
            velocity.abs()
        } else {
            FIXED_INCREMENT
        };

        if self.time >= self.speed {
            self.time = 0.0;
            self.current_frame = if self.looping {
                (self.current_frame + 1) % self.frames.len()
            } else {
                (self.current_frame + 1).min(last)
            };
        }
    }

    pub fn current_frame(&self) -> SpriteRef {
        SpriteRef {
            frame: self.frames[self.current_frame].clone(),
            flipped: self.flipped,
        }
    }

    pub fn first_frame(&self) -> SpriteRef {
        SpriteRef {
            frame: self.frames[0].clone(),
            flipped: self.flipped,
        }
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.time = 0.0;
    }

    /// Thresholds below one are clamped up.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_nan() { MIN_SPEED } else { speed.max(MIN_SPEED) };
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn frame_index(&self) -> usize {
        self.current_frame
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// A one-shot animation resting on its last frame.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.current_frame == self.frames.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<SpriteFrame> {
        (0..n).map(|_| SpriteFrame::solid(2, 2, [255; 4])).collect()
    }

    /// Velocity-scaled with velocity == speed advances exactly one frame per call.
    fn stepper(n: usize, looping: bool) -> Animation {
        Animation::new(frames(n), looping, true).unwrap()
    }

    #[test]
    fn empty_animation_is_rejected() {
        assert!(matches!(
            Animation::new(Vec::new(), true, false),
            Err(RuntimeError::EmptyAnimation)
        ));
    }

    #[test]
    fn looping_wraps_after_n_advances() {
        let mut anim = stepper(4, true);
        for _ in 0..4 {
            anim.update(1.0);
        }
        assert_eq!(anim.frame_index(), 0);
        anim.update(1.0);
        assert_eq!(anim.frame_index(), 1);
    }

    #[test]
    fn one_shot_clamps_on_last_frame() {
        let mut anim = stepper(3, false);
        for _ in 0..2 {
            anim.update(1.0);
        }
        assert_eq!(anim.frame_index(), 2);
        assert!(anim.is_finished());
        for _ in 0..10 {
            anim.update(1.0);
        }
        assert_eq!(anim.frame_index(), 2);
    }

    #[test]
    fn fixed_rate_needs_twenty_updates_per_frame() {
        let mut anim = Animation::looping(frames(2)).unwrap();
        for _ in 0..19 {
            anim.update(100.0);
        }
        assert_eq!(anim.frame_index(), 0, "velocity is ignored when not scaled");
        // 20 * 0.05 may land a hair under 1.0 in f32, so allow one extra step
        anim.update(0.0);
        anim.update(0.0);
        assert_eq!(anim.frame_index(), 1);
    }

    #[test]
    fn speed_is_clamped_to_one() {
        let mut anim = stepper(2, true);
        anim.set_speed(0.0);
        assert_eq!(anim.speed(), MIN_SPEED);
        anim.set_speed(-3.0);
        assert_eq!(anim.speed(), MIN_SPEED);
        anim.set_speed(4.0);
        assert_eq!(anim.speed(), 4.0);
    }

    #[test]
    fn reset_zeroes_index_and_time() {
        let mut anim = stepper(3, true).with_speed(2.0);
        anim.update(3.0);
        anim.update(1.5);
        assert_eq!(anim.frame_index(), 1);
        anim.reset();
        assert_eq!(anim.frame_index(), 0);
        anim.update(1.5);
        assert_eq!(anim.frame_index(), 0, "time accumulator was cleared");
    }

    #[test]
    fn flipped_flag_travels_with_frame() {
        let mut anim = stepper(1, true);
        anim.set_flipped(true);
        assert!(anim.current_frame().flipped);
    }
}

//! Named animation states with a single active entry.

use std::collections::HashMap;

use crate::animation::Animation;
use crate::error::{Result, RuntimeError};
use crate::sprite::SpriteRef;

pub const IDLE: &str = "idle";
pub const WALK: &str = "walk";
pub const RUN: &str = "run";
pub const JUMP: &str = "jump";
pub const FALL: &str = "fall";
pub const DODGE: &str = "dodge";
pub const MOVE: &str = "move";

#[derive(Debug, Clone)]
pub struct AnimationHandler {
    states: Vec<(String, Animation)>,
    active: usize,
    /// Facing of the owner; applies to whichever state is active.
    flipped: bool,
}

impl AnimationHandler {
    /// Fails when `default_state` has no animation.
    pub fn new(animations: HashMap<String, Animation>, default_state: &str) -> Result<Self> {
        let mut states: Vec<(String, Animation)> = animations.into_iter().collect();
        states.sort_by(|a, b| a.0.cmp(&b.0));
        let active = states
            .iter()
            .position(|(name, _)| name == default_state)
            .ok_or_else(|| RuntimeError::MissingDefaultState {
                state: default_state.to_string(),
            })?;
        Ok(Self {
            states,
            active,
            flipped: false,
        })
    }

    /// Handler with a single `idle` state.
    pub fn single(animation: Animation) -> Self {
        Self {
            states: vec![(IDLE.to_string(), animation)],
            active: 0,
            flipped: false,
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|(state, _)| state == name)
    }

    /// Switch to `name`, restarting it. Returns false (and changes nothing)
    /// when `name` is unknown or already active.
    pub fn set_animation(&mut self, name: &str) -> bool {
        match self.index_of(name) {
            Some(index) if index != self.active => {
                self.active = index;
                self.states[index].1.reset();
                true
            }
            _ => false,
        }
    }

    /// Advance the active animation. A one-shot animation that finished on a
    /// previous call hands control back to `idle` first.
    pub fn update_state(&mut self, velocity: f32) {
        if self.current().is_finished() {
            self.set_animation(IDLE);
        }
        self.current_mut().update(velocity);
    }

    /// Advance the active animation without the `idle` fallback, so a
    /// finished one-shot rests on its last frame.
    pub fn update_holding(&mut self, velocity: f32) {
        self.current_mut().update(velocity);
    }

    pub fn sprite(&self) -> SpriteRef {
        SpriteRef {
            flipped: self.flipped,
            ..self.current().current_frame()
        }
    }

    pub fn current_name(&self) -> &str {
        &self.states[self.active].0
    }

    pub fn current(&self) -> &Animation {
        &self.states[self.active].1
    }

    pub fn current_mut(&mut self) -> &mut Animation {
        &mut self.states[self.active].1
    }

    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.index_of(name).map(|index| &self.states[index].1)
    }

    pub fn has(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }
}

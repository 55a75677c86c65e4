//! The single game-object type.
//!
//! Behaviour is composed rather than inherited: every entity has an
//! animation handler, may opt into gravity and collision, and carries one
//! [`Locomotion`] variant that decides how it moves each tick.

use std::fmt;

use glam::Vec2;

use crate::animation_handler::AnimationHandler;
use crate::canvas::{Canvas, Rect};
use crate::character::{CharacterMotion, FALL_THRESHOLD};
use crate::collision::{Collider, CollisionComponent};
use crate::frame::FrameInput;
use crate::gravity::GravityComponent;
use crate::vehicle::VehicleMotion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Locomotion {
    Static,
    Character(CharacterMotion),
    Vehicle(VehicleMotion),
}

/// What an entity sees of the world during its update.
#[derive(Debug, Clone, Copy)]
pub struct UpdateParams<'a> {
    pub input: &'a FrameInput,
    /// Collidable boxes as they stood at the start of this update pass.
    pub colliders: &'a [Collider],
    /// Horizontal parallax offset applied to scrolling traffic this tick.
    pub scroll_dx: f32,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    /// Top-left corner, y grows downward.
    pub position: Vec2,
    /// Draw size. Falls back to the current sprite's pixel size.
    pub size: Option<Vec2>,
    pub gravity: Option<GravityComponent>,
    pub collision: Option<CollisionComponent>,
    pub animations: AnimationHandler,
    pub locomotion: Locomotion,
}

impl Entity {
    pub fn new(name: impl Into<String>, position: Vec2, animations: AnimationHandler) -> Self {
        Self {
            name: name.into(),
            position,
            size: None,
            gravity: None,
            collision: None,
            animations,
            locomotion: Locomotion::Static,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Vec2::new(width, height));
        self
    }

    pub fn with_gravity(mut self, gravity: GravityComponent) -> Self {
        self.gravity = Some(gravity);
        self
    }

    /// Collision box of the given size; also the draw size unless one is set.
    pub fn with_collision(mut self, width: f32, height: f32) -> Self {
        self.collision = Some(CollisionComponent::new(width, height));
        if self.size.is_none() {
            self.size = Some(Vec2::new(width, height));
        }
        self
    }

    pub fn with_locomotion(mut self, locomotion: Locomotion) -> Self {
        self.locomotion = locomotion;
        self
    }

    /// Teleport, treating the new spot as solid footing for a character.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        if let Locomotion::Character(motion) = &mut self.locomotion {
            motion.settle_at(position.y);
        }
        if let Some(gravity) = &mut self.gravity {
            gravity.reset_velocity();
        }
    }

    pub fn character(&self) -> Option<&CharacterMotion> {
        match &self.locomotion {
            Locomotion::Character(motion) => Some(motion),
            _ => None,
        }
    }

    pub fn character_mut(&mut self) -> Option<&mut CharacterMotion> {
        match &mut self.locomotion {
            Locomotion::Character(motion) => Some(motion),
            _ => None,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        let fall = self.gravity.map_or(0.0, |g| g.velocity_y());
        match &self.locomotion {
            Locomotion::Static => Vec2::new(0.0, fall),
            Locomotion::Character(motion) => motion.velocity() + Vec2::new(0.0, fall),
            Locomotion::Vehicle(vehicle) => Vec2::new(vehicle.velocity_x, fall),
        }
    }

    pub fn height(&self) -> f32 {
        self.render_size().y
    }

    pub fn render_size(&self) -> Vec2 {
        self.size.unwrap_or_else(|| {
            let (w, h) = self.animations.sprite().size();
            Vec2::new(w as f32, h as f32)
        })
    }

    pub fn collider(&self, id: EntityId) -> Option<Collider> {
        self.collision.map(|c| c.collider(id, self.position))
    }

    pub fn is_expired(&self) -> bool {
        matches!(&self.locomotion, Locomotion::Vehicle(vehicle) if vehicle.is_expired())
    }

    fn is_falling(&self) -> bool {
        self.gravity
            .is_some_and(|g| g.velocity_y() > FALL_THRESHOLD)
    }

    fn is_jumping(&self) -> bool {
        self.character().is_some_and(CharacterMotion::is_jumping)
    }

    /// Movement, then gravity, then ground collision. A character in the
    /// middle of a jump arc skips gravity; the arc owns its vertical motion.
    pub fn update(&mut self, id: EntityId, params: &UpdateParams<'_>) {
        let falling = self.is_falling();
        match &mut self.locomotion {
            Locomotion::Static => {}
            Locomotion::Character(motion) => {
                motion.tick(params.input, &mut self.position, &mut self.animations, falling)
            }
            Locomotion::Vehicle(vehicle) => {
                vehicle.tick(&mut self.position, &mut self.animations, params.scroll_dx)
            }
        }

        if !self.is_jumping() {
            if let Some(gravity) = &mut self.gravity {
                gravity.apply_gravity(params.input.dt);
                self.position.y += gravity.velocity_y();
            }
        }

        if let Some(collision) = self.collision {
            for other in params.colliders {
                collision.resolve_collision(id, &mut self.position, self.gravity.as_mut(), other);
            }
        }
    }

    /// Advance the animation by the current speed and draw.
    pub fn late_update(&mut self, canvas: &mut dyn Canvas) {
        let speed = match &self.locomotion {
            Locomotion::Static => 0.0,
            Locomotion::Character(motion) => motion.speed_factor(),
            Locomotion::Vehicle(vehicle) => vehicle.velocity_x.abs(),
        };
        if self.is_jumping() {
            self.animations.update_holding(speed);
        } else {
            self.animations.update_state(speed);
        }
        self.draw(canvas);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let size = self.render_size();
        canvas.draw_sprite(
            &self.animations.sprite(),
            Rect::new(self.position.x, self.position.y, size.x, size.y),
        );
    }
}

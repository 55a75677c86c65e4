//! Box overlap tests and ground snapping.
//!
//! Boxes use the entity convention: `position` is the top-left corner and y
//! grows downward, so "on top of" means a smaller y.

use glam::Vec2;

use crate::entity::EntityId;
use crate::gravity::GravityComponent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Strict overlap on both axes. Touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }
}

/// A collidable box as seen by other entities during one update pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub owner: EntityId,
    pub bounds: Aabb,
}

/// Fixed-size box that always follows its owner's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionComponent {
    pub width: f32,
    pub height: f32,
}

impl CollisionComponent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self, owner_position: Vec2) -> Aabb {
        Aabb::new(owner_position.x, owner_position.y, self.width, self.height)
    }

    pub fn collider(&self, owner: EntityId, owner_position: Vec2) -> Collider {
        Collider {
            owner,
            bounds: self.bounds(owner_position),
        }
    }

    pub fn check_collision(&self, owner: EntityId, owner_position: Vec2, other: &Collider) -> bool {
        owner != other.owner && self.bounds(owner_position).overlaps(&other.bounds)
    }

    /// Push the owner up onto `other`. Only owners that fall can land, so
    /// without a gravity component this never moves anything. Returns true
    /// when the owner was snapped.
    pub fn resolve_collision(
        &self,
        owner: EntityId,
        owner_position: &mut Vec2,
        gravity: Option<&mut GravityComponent>,
        other: &Collider,
    ) -> bool {
        let Some(gravity) = gravity else {
            return false;
        };
        if !self.check_collision(owner, *owner_position, other) {
            return false;
        }
        gravity.reset_velocity();
        owner_position.y = other.bounds.top - self.height;
        true
    }
}

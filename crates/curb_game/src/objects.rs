use std::collections::HashMap;
use std::path::Path;

use curb_core::animation::Animation;
use curb_core::animation_handler::{AnimationHandler, IDLE, MOVE};
use curb_core::assets::SpriteLoader;
use curb_core::entity::{Entity, Locomotion};
use curb_core::sprite::SpriteFrame;
use curb_core::vehicle::VehicleMotion;
use curb_core::Result;
use glam::Vec2;

use crate::stage::StageFile;

const ASPHALT: [u8; 4] = [58, 58, 64, 255];
pub const JEEP_SIZE: Vec2 = Vec2::new(160.0, 90.0);

/// The street surface: a static collider spanning the screen.
pub fn ground(stage: &StageFile) -> Result<Entity> {
    let still = Animation::looping(vec![SpriteFrame::solid(4, 4, ASPHALT)])?;
    Ok(
        Entity::new("ground", Vec2::new(0.0, stage.ground_y), AnimationHandler::single(still))
            .with_collision(stage.ground_width, stage.ground_height),
    )
}

/// Reposition and resize an existing ground after a stage reload.
pub fn reshape_ground(ground: &mut Entity, stage: &StageFile) {
    ground.set_position(Vec2::new(0.0, stage.ground_y));
    ground.size = Some(Vec2::new(stage.ground_width, stage.ground_height));
    if let Some(collision) = &mut ground.collision {
        collision.width = stage.ground_width;
        collision.height = stage.ground_height;
    }
}

/// Jeep template, parked at the origin. Clone it per spawn so every jeep
/// shares the same frames.
pub fn jeep(loader: &dyn SpriteLoader, stage: &StageFile) -> Result<Entity> {
    let mut animations = HashMap::new();
    animations.insert(
        IDLE.to_string(),
        Animation::new(
            loader.load_strip(
                Path::new("sprites/jeep/idle.png"),
                Path::new("animations/jeep/idle.json"),
            )?,
            true,
            false,
        )?,
    );
    animations.insert(
        MOVE.to_string(),
        Animation::new(
            loader.load_strip(
                Path::new("sprites/jeep/move.png"),
                Path::new("animations/jeep/move.json"),
            )?,
            true,
            true,
        )?,
    );
    let handler = AnimationHandler::new(animations, IDLE)?;
    Ok(Entity::new("jeep", Vec2::ZERO, handler)
        .with_size(JEEP_SIZE.x, JEEP_SIZE.y)
        .with_locomotion(Locomotion::Vehicle(VehicleMotion::new(
            stage.vehicle_speed,
            stage.vehicle_lifetime_ticks,
        ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_follows_stage_layout() {
        let stage = StageFile::default();
        let mut ground = ground(&stage).unwrap();
        assert_eq!(ground.position, Vec2::new(0.0, 600.0));
        assert_eq!(ground.render_size(), Vec2::new(1280.0, 50.0));

        let moved = StageFile {
            ground_y: 620.0,
            ground_height: 30.0,
            ..stage
        };
        reshape_ground(&mut ground, &moved);
        let collider = ground.collider(curb_core::entity::EntityId::new(0)).unwrap();
        assert_eq!(collider.bounds.top, 620.0);
        assert_eq!(collider.bounds.height, 30.0);
        assert_eq!(ground.height(), 30.0);
    }
}

//! Playable character definitions.
//!
//! Each character's sheets live under `sprites/<id>/` with frame rectangles
//! under `animations/<id>/<state>.json`.

use std::collections::HashMap;
use std::path::PathBuf;

use curb_core::animation::Animation;
use curb_core::animation_handler::{AnimationHandler, DODGE, FALL, IDLE, JUMP, RUN, WALK};
use curb_core::assets::SpriteLoader;
use curb_core::character::{CharacterConfig, CharacterMotion, FlipWhen};
use curb_core::entity::{Entity, Locomotion};
use curb_core::gravity::GravityComponent;
use curb_core::registry::CharacterRegistry;
use curb_core::Result;
use glam::Vec2;

pub const ROLLERBLADER: &str = "rollerblader";
pub const BLAZE: &str = "blaze";

struct Clip {
    state: &'static str,
    sheet: &'static str,
    looping: bool,
    scaled: bool,
}

const fn clip(state: &'static str, sheet: &'static str, looping: bool, scaled: bool) -> Clip {
    Clip {
        state,
        sheet,
        looping,
        scaled,
    }
}

fn load_clips(loader: &dyn SpriteLoader, character: &str, clips: &[Clip]) -> Result<AnimationHandler> {
    let mut animations = HashMap::new();
    for clip in clips {
        let sheet = PathBuf::from(format!("sprites/{character}/{}.png", clip.sheet));
        let rects = PathBuf::from(format!("animations/{character}/{}.json", clip.state));
        let frames = loader.load_strip(&sheet, &rects)?;
        animations.insert(
            clip.state.to_string(),
            Animation::new(frames, clip.looping, clip.scaled)?,
        );
    }
    AnimationHandler::new(animations, IDLE)
}

/// Grounded skater: falls under gravity, lands on colliders, jumps and dodges.
pub fn rollerblader(loader: &dyn SpriteLoader) -> Result<Entity> {
    let handler = load_clips(
        loader,
        ROLLERBLADER,
        &[
            clip(IDLE, "idle", true, true),
            clip(WALK, "walk", true, true),
            clip(RUN, "run", true, true),
            clip(JUMP, "jump", false, true),
            clip(DODGE, "dodge", false, true),
            clip(FALL, "fall", true, true),
        ],
    )?;
    Ok(Entity::new(ROLLERBLADER, Vec2::ZERO, handler)
        .with_gravity(GravityComponent::default())
        .with_collision(50.0, 100.0)
        .with_locomotion(Locomotion::Character(CharacterMotion::new(
            CharacterConfig::default(),
        ))))
}

/// Walks freely along the depth of the street, inside a vertical band.
/// Its sheets face left, so it mirrors when heading right.
pub fn blaze(loader: &dyn SpriteLoader) -> Result<Entity> {
    let handler = load_clips(
        loader,
        BLAZE,
        &[
            clip(IDLE, "idle", true, false),
            clip(WALK, "walk", true, true),
            clip(RUN, "walk", true, true),
        ],
    )?;
    let config = CharacterConfig {
        free_roam: true,
        flip: FlipWhen::MovingRight,
        min_y: 420.0,
        max_y: 560.0,
        ..CharacterConfig::default()
    };
    Ok(Entity::new(BLAZE, Vec2::ZERO, handler)
        .with_size(56.0, 104.0)
        .with_locomotion(Locomotion::Character(CharacterMotion::new(config))))
}

pub fn registry() -> CharacterRegistry {
    CharacterRegistry::new()
        .register(ROLLERBLADER, rollerblader)
        .register(BLAZE, blaze)
}

/// Upper-case label shown under a character in menus.
pub fn display_name(id: &str) -> String {
    id.to_uppercase()
}

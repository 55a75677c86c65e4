//! Scripted key holds for deterministic movement tests.
//!
//! ```json
//! { "fixed_dt": 0.016666667,
//!   "frames": [ { "hold": ["Right"], "repeat": 30 }, { "hold": ["Right", "Space"] } ] }
//! ```
//!
//! Each frame entry lists the keys held for `repeat` ticks. Presses and
//! releases fall out of the transitions between entries.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::frame::FrameInput;
use crate::input::{InputState, Key};

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub hold: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut input = InputState::new();
        let mut held: HashSet<Key> = HashSet::new();
        let mut out = Vec::new();
        for frame in &self.frames {
            let wanted: HashSet<Key> = frame.hold.iter().copied().collect();
            for _ in 0..frame.repeat.max(1) {
                for key in held.difference(&wanted) {
                    input.key_up(*key);
                }
                for key in wanted.difference(&held) {
                    input.key_down(*key);
                }
                held.clone_from(&wanted);
                out.push(input.snapshot(self.fixed_dt));
                input.end_frame();
            }
        }
        out
    }
}

pub fn load_replay_from_str(raw: &str) -> Result<ReplaySequence, String> {
    let replay: ReplaySequence =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse replay JSON: {e}"))?;
    validate_replay(&replay)?;
    Ok(replay)
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    load_replay_from_str(&raw)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::animation_handler::{AnimationHandler, IDLE, JUMP, RUN, WALK};
    use crate::character::{CharacterConfig, CharacterMotion};
    use crate::entity::{Entity, Locomotion};
    use crate::gravity::GravityComponent;
    use crate::scene::Scene;
    use crate::sprite::SpriteFrame;
    use glam::Vec2;
    use std::collections::HashMap;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "curb_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn street_with_hero() -> (Scene, crate::entity::EntityId) {
        let still = || Animation::looping(vec![SpriteFrame::solid(4, 8, [1; 4])]).unwrap();
        let handler = AnimationHandler::new(
            [IDLE, WALK, RUN, JUMP]
                .into_iter()
                .map(|name| (name.to_string(), still()))
                .collect::<HashMap<_, _>>(),
            IDLE,
        )
        .unwrap();

        let mut scene = Scene::new();
        scene.add_object(
            Entity::new("ground", Vec2::new(0.0, 600.0), AnimationHandler::single(still()))
                .with_collision(1280.0, 50.0),
        );
        let mut hero = Entity::new("hero", Vec2::ZERO, handler)
            .with_gravity(GravityComponent::default())
            .with_collision(50.0, 100.0)
            .with_locomotion(Locomotion::Character(
                CharacterMotion::new(CharacterConfig::default()).controlled(),
            ));
        hero.set_position(Vec2::new(300.0, 500.0));
        let id = scene.add_object(hero);
        (scene, id)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "hold": ["Right"], "repeat": 3 },
                { "hold": ["Right", "Space"] },
                { "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let inputs = replay.expanded_inputs();
        assert_eq!(inputs.len(), 6);
        assert!(inputs[0].is_pressed(Key::Right));
        assert!(!inputs[1].is_pressed(Key::Right));
        assert!(inputs[1].is_held(Key::Right));
        assert!(inputs[3].is_pressed(Key::Space));
        assert!(!inputs[4].is_held(Key::Right));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        assert!(load_replay_from_str(r#"{ "frames": [] }"#).is_err());
        assert!(load_replay_from_str(r#"{ "fixed_dt": 0, "frames": [{}] }"#).is_err());
    }

    #[test]
    fn walk_jump_and_land_on_the_street() {
        let replay = load_replay_from_str(
            r#"{
              "frames": [
                { "hold": ["Right"], "repeat": 20 },
                { "hold": ["Right", "Space"], "repeat": 1 },
                { "hold": ["Right"], "repeat": 80 },
                { "repeat": 20 }
              ]
            }"#,
        )
        .unwrap();
        let (mut scene, hero) = street_with_hero();

        let mut airborne_ticks = 0;
        for input in replay.expanded_inputs() {
            scene.update(&input);
            let entity = scene.get(hero).unwrap();
            if entity.character().unwrap().is_jumping() {
                airborne_ticks += 1;
                assert!(entity.position.y < 500.0);
                assert_eq!(entity.animations.current_name(), JUMP);
            }
        }

        let entity = scene.get(hero).unwrap();
        // 47-tick arc, the landing tick itself reports grounded
        assert_eq!(airborne_ticks, 46);
        assert_eq!(entity.position.y, 500.0);
        assert_eq!(entity.animations.current_name(), IDLE);
        assert!(entity.position.x > 300.0);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = load_replay_from_str(
            r#"{
              "frames": [
                { "hold": ["Right", "Shift"], "repeat": 40 },
                { "hold": ["Left", "Space"], "repeat": 30 },
                { "hold": ["Left"], "repeat": 45 }
              ]
            }"#,
        )
        .unwrap();
        let inputs = replay.expanded_inputs();

        let (mut run_a, hero_a) = street_with_hero();
        let (mut run_b, hero_b) = street_with_hero();
        for input in &inputs {
            run_a.update(input);
        }
        for input in &inputs {
            run_b.update(input);
        }
        let a = run_a.get(hero_a).unwrap();
        let b = run_b.get(hero_b).unwrap();
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity(), b.velocity());
        assert_eq!(a.animations.current_name(), b.animations.current_name());
    }
}

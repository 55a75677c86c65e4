//! The street: scrolling backgrounds, the ground, passing jeeps and the
//! player-controlled character.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use curb_core::assets::SpriteLoader;
use curb_core::canvas::{Canvas, Color, Rect};
use curb_core::entity::{Entity, EntityId, Locomotion};
use curb_core::frame::FrameContext;
use curb_core::input::Key;
use curb_core::scene::Scene;
use curb_core::scheduler::{LateUpdatable, Updatable};
use curb_core::settings::Difficulty;
use curb_core::sprite::{SpriteFrame, SpriteRef};
use curb_core::Result;
use glam::Vec2;

use crate::objects;
use crate::screens::MAIN_MENU;
use crate::stage::{load_stage_from_path, load_stage_or_default, FileWatcher, StageFile};

/// New strips are queued this far before the right edge comes into view.
const REFILL_MARGIN: f32 = 20.0;
/// Strips are dropped once they are this far past the left edge.
const DISCARD_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Strip {
    image: usize,
    x: f32,
}

/// Endless row of background images sliding left. Images are picked at
/// random as the row grows on the right.
#[derive(Debug, Clone)]
pub struct Parallax {
    widths: Vec<f32>,
    strips: Vec<Strip>,
    view_width: f32,
}

impl Parallax {
    pub fn new(widths: Vec<f32>, view_width: f32) -> Self {
        let strips = if widths.is_empty() {
            Vec::new()
        } else {
            vec![Strip { image: 0, x: 0.0 }]
        };
        Self {
            widths,
            strips,
            view_width,
        }
    }

    /// `pick(n)` chooses the image index for a new strip among `n` images.
    pub fn advance(&mut self, dx: f32, mut pick: impl FnMut(usize) -> usize) {
        let count = self.widths.len();
        if count == 0 {
            return;
        }
        for strip in &mut self.strips {
            strip.x -= dx;
        }

        while let Some(last) = self.strips.last() {
            let right = last.x + self.widths[last.image];
            if right > self.view_width + REFILL_MARGIN {
                break;
            }
            self.strips.push(Strip {
                image: pick(count) % count,
                x: right,
            });
        }

        while self.strips.len() > 1 && self.strips[0].x + self.widths[self.strips[0].image] < -DISCARD_MARGIN {
            self.strips.remove(0);
        }
    }

    /// `(image index, left x, width)` for every visible strip, left to right.
    pub fn strips(&self) -> impl Iterator<Item = (usize, f32, f32)> + '_ {
        self.strips
            .iter()
            .map(|s| (s.image, s.x, self.widths[s.image]))
    }
}

fn load_backgrounds(loader: &dyn SpriteLoader, paths: &[String]) -> Vec<SpriteFrame> {
    paths
        .iter()
        .filter_map(|path| match loader.load_sheet(Path::new(path)) {
            Ok(sheet) => Some(SpriteFrame::new((*sheet).clone())),
            Err(e) => {
                log::error!("Skipping street background: {e}");
                None
            }
        })
        .collect()
}

/// Width of each image once scaled to fill the view height.
fn scaled_widths(backgrounds: &[SpriteFrame], view: Vec2) -> Vec<f32> {
    backgrounds
        .iter()
        .map(|frame| {
            let (w, h) = frame.size();
            w as f32 * view.y / h.max(1) as f32
        })
        .collect()
}

fn spawn_delay(stage: &StageFile, difficulty: Difficulty) -> u32 {
    let base = stage.next_spawn_delay();
    match difficulty {
        Difficulty::Easy => base.saturating_mul(3) / 2,
        Difficulty::Medium => base,
        Difficulty::Hard => (base.saturating_mul(2) / 3).max(1),
    }
}

pub struct StreetScene {
    loader: Rc<dyn SpriteLoader>,
    view: Vec2,
    stage: StageFile,
    watcher: FileWatcher,
    scene: Scene,
    ground: EntityId,
    player: EntityId,
    backgrounds: Vec<SpriteFrame>,
    parallax: Parallax,
    jeep: Option<Entity>,
    spawn_countdown: u32,
    difficulty: Difficulty,
}

impl StreetScene {
    pub fn new(
        loader: Rc<dyn SpriteLoader>,
        stage_path: PathBuf,
        view: Vec2,
        mut player: Entity,
        difficulty: Difficulty,
    ) -> Result<Self> {
        let stage = load_stage_or_default(&stage_path);
        let watcher = FileWatcher::new(stage_path);

        let mut scene = Scene::new();
        let ground = scene.add_object(objects::ground(&stage)?);

        if let Some(motion) = player.character_mut() {
            motion.controlled = true;
        }
        let spawn = Vec2::new(stage.player_spawn_x, stage.ground_y - player.height());
        player.set_position(spawn);
        log::info!("Street: '{}' enters at ({}, {})", player.name, spawn.x, spawn.y);
        let player = scene.add_object(player);

        let jeep = match objects::jeep(loader.as_ref(), &stage) {
            Ok(jeep) => Some(jeep),
            Err(e) => {
                log::error!("Street: no traffic, jeep failed to load: {e}");
                None
            }
        };

        let backgrounds = load_backgrounds(loader.as_ref(), &stage.backgrounds);
        let parallax = Parallax::new(scaled_widths(&backgrounds, view), view.x);
        let spawn_countdown = spawn_delay(&stage, difficulty);

        Ok(Self {
            loader,
            view,
            stage,
            watcher,
            scene,
            ground,
            player,
            backgrounds,
            parallax,
            jeep,
            spawn_countdown,
            difficulty,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn player(&self) -> Option<&Entity> {
        self.scene.get(self.player)
    }

    pub fn stage(&self) -> &StageFile {
        &self.stage
    }

    fn reload_stage(&mut self, reason: &str) {
        let stage = match load_stage_from_path(self.watcher.path()) {
            Ok(stage) => stage,
            Err(e) => {
                log::error!("Stage reload ({reason}) failed, keeping current layout: {e}");
                return;
            }
        };

        if let Some(ground) = self.scene.get_mut(self.ground) {
            objects::reshape_ground(ground, &stage);
        }
        if let Some(Locomotion::Vehicle(vehicle)) = self.jeep.as_mut().map(|j| &mut j.locomotion) {
            vehicle.velocity_x = stage.vehicle_speed;
            vehicle.lifetime_ticks = stage.vehicle_lifetime_ticks;
        }
        if stage.backgrounds != self.stage.backgrounds {
            self.backgrounds = load_backgrounds(self.loader.as_ref(), &stage.backgrounds);
            self.parallax = Parallax::new(scaled_widths(&self.backgrounds, self.view), self.view.x);
        }
        self.spawn_countdown = self.spawn_countdown.min(stage.vehicle_spawn_max_ticks);
        self.stage = stage;
        log::info!("Stage reloaded ({reason})");
    }

    fn spawn_traffic(&mut self) {
        self.spawn_countdown = self.spawn_countdown.saturating_sub(1);
        if self.spawn_countdown > 0 {
            return;
        }
        self.spawn_countdown = spawn_delay(&self.stage, self.difficulty);
        if let Some(template) = &self.jeep {
            let mut jeep = template.clone();
            jeep.set_position(Vec2::new(self.view.x, self.stage.vehicle_y));
            self.scene.add_object(jeep);
        }
    }
}

impl Updatable for StreetScene {
    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        if ctx.input.is_pressed(Key::Escape) {
            ctx.switch_screen(MAIN_MENU);
            return;
        }
        if ctx.input.is_pressed(Key::R) {
            self.reload_stage("manual trigger (R)");
        } else if self.watcher.should_reload() {
            self.reload_stage("file watcher");
        }

        let speed = self.stage.scroll_speed;
        self.parallax.advance(speed, |n| fastrand::usize(..n));
        self.spawn_traffic();
        self.scene.set_scroll(-speed);
        self.scene.update(ctx.input);
    }

    fn entity_count(&self) -> usize {
        self.scene.len()
    }
}

impl LateUpdatable for StreetScene {
    fn late_update(&mut self, _ctx: &mut FrameContext<'_>, canvas: &mut dyn Canvas) {
        canvas.clear(Color::BLACK);
        for (image, x, width) in self.parallax.strips() {
            let sprite = SpriteRef {
                frame: self.backgrounds[image].clone(),
                flipped: false,
            };
            canvas.draw_sprite(&sprite, Rect::new(x, 0.0, width, self.view.y));
        }
        self.scene.late_update(canvas);
    }
}

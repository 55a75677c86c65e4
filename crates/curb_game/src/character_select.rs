use curb_core::animation_handler::IDLE;
use curb_core::canvas::{Canvas, Color, Rect, TextAlign};
use curb_core::entity::Entity;
use curb_core::frame::FrameContext;
use curb_core::input::{Key, MouseBtn};
use curb_core::scheduler::{LateUpdatable, Updatable};
use curb_core::sprite::{SpriteFrame, SpriteRef};
use glam::Vec2;

use crate::characters::display_name;
use crate::menu::label_or;
use crate::screens::MAIN_MENU;

const CLICK_COOLDOWN_TICKS: u32 = 10;
const SPACING: f32 = 200.0;
const SELECTED_SCALE: f32 = 1.8;
const IDLE_SCALE: f32 = 1.6;
/// Animation advance per tick for the highlighted character.
const PREVIEW_SPEED: f32 = 0.05;

/// Carousel of playable characters. The highlighted one animates in the
/// middle; the rest show their first idle frame.
pub struct CharacterSelect {
    view: Vec2,
    characters: Vec<(&'static str, Entity)>,
    selected: usize,
    cooldown: u32,
    hitboxes: Vec<Rect>,
    background: Option<SpriteFrame>,
}

impl CharacterSelect {
    pub fn new(
        view: Vec2,
        characters: Vec<(&'static str, Entity)>,
        saved: Option<&str>,
        background: Option<SpriteFrame>,
    ) -> Self {
        let selected = saved
            .and_then(|id| characters.iter().position(|(c, _)| *c == id))
            .unwrap_or(0);
        Self {
            view,
            characters,
            selected,
            cooldown: 0,
            hitboxes: Vec::new(),
            background,
        }
    }

    pub fn selected_id(&self) -> Option<&'static str> {
        self.characters.get(self.selected).map(|(id, _)| *id)
    }

    fn cycle(&mut self, step: isize) {
        let len = self.characters.len() as isize;
        if len > 0 {
            self.selected = (self.selected as isize + step).rem_euclid(len) as usize;
        }
    }
}

impl Updatable for CharacterSelect {
    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        let input = ctx.input;
        if input.is_pressed(Key::Left) {
            self.cycle(-1);
        } else if input.is_pressed(Key::Right) {
            self.cycle(1);
        } else if input.is_pressed(Key::Enter) {
            if let Some(id) = self.selected_id() {
                log::info!("Character select: confirmed '{id}'");
                ctx.select_character(id);
                ctx.switch_screen(MAIN_MENU);
            }
        } else if input.is_pressed(Key::Escape) {
            ctx.switch_screen(MAIN_MENU);
        }

        if input.is_mouse_clicked(MouseBtn::Left) && self.cooldown == 0 {
            if let Some(i) = self
                .hitboxes
                .iter()
                .position(|r| r.contains(input.mouse_position))
            {
                self.selected = i;
                self.cooldown = CLICK_COOLDOWN_TICKS;
            }
        }
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    fn entity_count(&self) -> usize {
        self.characters.len()
    }
}

impl LateUpdatable for CharacterSelect {
    fn late_update(&mut self, ctx: &mut FrameContext<'_>, canvas: &mut dyn Canvas) {
        canvas.clear(Color::BLACK);
        if let Some(background) = &self.background {
            canvas.draw_sprite(
                &SpriteRef {
                    frame: background.clone(),
                    flipped: false,
                },
                Rect::new(0.0, 0.0, self.view.x, self.view.y),
            );
        }

        let title = label_or(ctx.game.text("character_select.title"), "Select Character");
        canvas.draw_text(
            &title,
            Vec2::new(self.view.x / 2.0, 100.0),
            32.0,
            Color::WHITE,
            TextAlign::Center,
        );

        let center = Vec2::new(self.view.x / 2.0, self.view.y / 1.6);
        self.hitboxes.clear();
        for (i, (id, entity)) in self.characters.iter_mut().enumerate() {
            let is_selected = i == self.selected;
            let offset = (i as f32 - self.selected as f32) * SPACING;
            let position = center + Vec2::new(offset, 0.0);
            let scale = if is_selected { SELECTED_SCALE } else { IDLE_SCALE };
            let size = entity.render_size() * scale;

            let sprite = if is_selected {
                entity.animations.update_state(PREVIEW_SPEED);
                entity.animations.sprite()
            } else {
                entity
                    .animations
                    .get(IDLE)
                    .map(|idle| idle.first_frame())
                    .unwrap_or_else(|| entity.animations.sprite())
            };

            let dest = Rect::centered(position, size.x, size.y);
            canvas.draw_text(
                &display_name(id),
                Vec2::new(position.x, position.y - size.y / 2.0 - 20.0),
                if is_selected { 16.0 } else { 14.0 },
                Color::WHITE,
                TextAlign::Center,
            );
            canvas.draw_sprite(&sprite, dest);
            self.hitboxes.push(dest);
        }
    }
}

//! Render target abstraction used by every late-update.
//!
//! The core never talks to the GPU. Late-update phases draw into a
//! [`Canvas`]; the game records into a [`DrawList`] and hands that to the
//! renderer, and tests inspect the same list.

use glam::Vec2;

use crate::sprite::SpriteRef;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 0.9, 0.1);
    pub const GRAY: Color = Color::rgb(0.35, 0.35, 0.38);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Axis-aligned screen rectangle, top-left origin, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w * 0.5, center.y - h * 0.5, w, h)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

pub trait Canvas {
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn draw_sprite(&mut self, sprite: &SpriteRef, dest: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Draw a line of text. Returns the approximate bounds so callers can
    /// hit-test it against the mouse.
    fn draw_text(
        &mut self,
        text: &str,
        anchor: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
    ) -> Rect;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Sprite {
        sprite: SpriteRef,
        dest: Rect,
    },
    Fill {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        bounds: Rect,
        size: f32,
        color: Color,
    },
}

/// A canvas that records commands in submission order.
#[derive(Debug, Clone)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Rough glyph metrics shared by the recorder and the overlay painter.
pub fn measure_text(text: &str, size: f32) -> Vec2 {
    Vec2::new(text.chars().count() as f32 * size * 0.55, size)
}

impl Canvas for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_sprite(&mut self, sprite: &SpriteRef, dest: Rect) {
        self.commands.push(DrawCommand::Sprite {
            sprite: sprite.clone(),
            dest,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn draw_text(
        &mut self,
        text: &str,
        anchor: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
    ) -> Rect {
        let extent = measure_text(text, size);
        let bounds = match align {
            TextAlign::Left => Rect::new(anchor.x, anchor.y, extent.x, extent.y),
            TextAlign::Center => Rect::centered(anchor, extent.x, extent.y),
        };
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            bounds,
            size,
            color,
        });
        bounds
    }
}

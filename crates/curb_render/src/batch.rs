//! Turns a recorded [`DrawList`](curb_core::canvas::DrawList) into one
//! vertex/index mesh plus a list of draw calls.
//!
//! Commands are emitted in submission order, so consecutive quads sharing a
//! texture collapse into a single `draw_indexed`. Solid fills sample a white
//! texture and all land in the same [`BatchKey::White`] bucket. Text is left
//! to the egui painter.

use std::collections::HashSet;

use curb_core::canvas::{Color, DrawCommand, Rect};
use curb_core::sprite::SpriteFrame;

use crate::vertex::SpriteVertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKey {
    White,
    Frame(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub key: BatchKey,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct SpriteBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
    pub clear_color: Color,
    frames: Vec<SpriteFrame>,
    seen: HashSet<u64>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            draw_calls: Vec::new(),
            clear_color: Color::BLACK,
            frames: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn from_commands(commands: &[DrawCommand]) -> Self {
        let mut batch = Self::new();
        batch.rebuild(commands);
        batch
    }

    /// Rebuild in place, keeping the allocations from the last frame.
    pub fn rebuild(&mut self, commands: &[DrawCommand]) {
        self.reset(Color::BLACK);
        for command in commands {
            match command {
                // a clear wipes whatever was queued before it
                DrawCommand::Clear(color) => self.reset(*color),
                DrawCommand::Sprite { sprite, dest } => {
                    let id = sprite.frame.id();
                    if self.seen.insert(id) {
                        self.frames.push(sprite.frame.clone());
                    }
                    self.add_quad(BatchKey::Frame(id), *dest, sprite.flipped, [1.0; 4]);
                }
                DrawCommand::Fill { rect, color } => {
                    if color.a > 0.0 {
                        self.add_quad(BatchKey::White, *rect, false, color.to_array());
                    }
                }
                DrawCommand::Text { .. } => {}
            }
        }
    }

    fn reset(&mut self, clear_color: Color) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
        self.frames.clear();
        self.seen.clear();
        self.clear_color = clear_color;
    }

    /// Frames referenced by this batch, first use first.
    pub fn frames(&self) -> &[SpriteFrame] {
        &self.frames
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.draw_calls.is_empty()
    }

    /// How many bind group switches drawing this batch will cost.
    pub fn texture_binds(&self) -> usize {
        let mut binds = 0;
        let mut current = None;
        for draw in &self.draw_calls {
            if current != Some(draw.key) {
                current = Some(draw.key);
                binds += 1;
            }
        }
        binds
    }

    fn add_quad(&mut self, key: BatchKey, dest: Rect, flipped: bool, color: [f32; 4]) {
        let base_index = self.vertices.len() as u32;
        self.vertices
            .extend_from_slice(&SpriteVertex::quad(dest, flipped, color));

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        push_draw_call(&mut self.draw_calls, key, draw_start, 6);
    }
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous.
fn push_draw_call(draw_calls: &mut Vec<DrawCall>, key: BatchKey, index_start: u32, index_count: u32) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.key == key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        key,
        index_start,
        index_count,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use curb_core::canvas::{Canvas, DrawList, TextAlign};
    use curb_core::sprite::SpriteRef;
    use glam::Vec2;

    fn sprite(frame: &SpriteFrame, flipped: bool) -> SpriteRef {
        SpriteRef {
            frame: frame.clone(),
            flipped,
        }
    }

    #[test]
    fn repeated_frame_collapses_into_one_draw() {
        let street = SpriteFrame::solid(8, 8, [9, 9, 9, 255]);
        let mut canvas = DrawList::new(100.0, 100.0);
        for i in 0..3 {
            canvas.draw_sprite(&sprite(&street, false), Rect::new(i as f32 * 8.0, 0.0, 8.0, 8.0));
        }

        let batch = SpriteBatch::from_commands(canvas.commands());
        assert_eq!(batch.quad_count(), 3);
        assert_eq!(
            batch.draw_calls,
            vec![DrawCall {
                key: BatchKey::Frame(street.id()),
                index_start: 0,
                index_count: 18,
            }]
        );
        assert_eq!(batch.frames().len(), 1);
    }

    #[test]
    fn alternating_textures_keep_submission_order() {
        let a = SpriteFrame::solid(2, 2, [1, 0, 0, 255]);
        let b = SpriteFrame::solid(2, 2, [0, 1, 0, 255]);
        let mut canvas = DrawList::new(10.0, 10.0);
        canvas.draw_sprite(&sprite(&a, false), Rect::new(0.0, 0.0, 2.0, 2.0));
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::GRAY);
        canvas.draw_sprite(&sprite(&b, false), Rect::new(0.0, 0.0, 2.0, 2.0));
        canvas.draw_sprite(&sprite(&a, false), Rect::new(0.0, 0.0, 2.0, 2.0));

        let batch = SpriteBatch::from_commands(canvas.commands());
        let keys: Vec<_> = batch.draw_calls.iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            vec![
                BatchKey::Frame(a.id()),
                BatchKey::White,
                BatchKey::Frame(b.id()),
                BatchKey::Frame(a.id()),
            ]
        );
        assert_eq!(batch.texture_binds(), 4);
        assert_eq!(batch.frames().len(), 2);
    }

    #[test]
    fn flipped_sprite_swaps_horizontal_uvs() {
        let frame = SpriteFrame::solid(4, 4, [255; 4]);
        let mut canvas = DrawList::new(10.0, 10.0);
        canvas.draw_sprite(&sprite(&frame, true), Rect::new(1.0, 2.0, 4.0, 4.0));

        let batch = SpriteBatch::from_commands(canvas.commands());
        assert_eq!(batch.vertices[0].position, [1.0, 2.0]);
        assert_eq!(batch.vertices[0].tex_coords, [1.0, 0.0]);
        assert_eq!(batch.vertices[2].position, [5.0, 6.0]);
        assert_eq!(batch.vertices[2].tex_coords, [0.0, 1.0]);
    }

    #[test]
    fn clear_discards_earlier_quads_and_sets_background() {
        let mut canvas = DrawList::new(10.0, 10.0);
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        canvas.clear(Color::GRAY);
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::YELLOW);

        let batch = SpriteBatch::from_commands(canvas.commands());
        assert_eq!(batch.clear_color, Color::GRAY);
        assert_eq!(batch.quad_count(), 1);
        assert_eq!(batch.vertices[0].color, Color::YELLOW.to_array());
    }

    #[test]
    fn text_and_transparent_fills_emit_no_geometry() {
        let mut canvas = DrawList::new(10.0, 10.0);
        canvas.draw_text("Play", Vec2::ZERO, 12.0, Color::WHITE, TextAlign::Left);
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK.with_alpha(0.0));

        let batch = SpriteBatch::from_commands(canvas.commands());
        assert!(batch.is_empty());
        assert!(batch.vertices.is_empty());
    }

    #[test]
    fn rebuild_reuses_the_batch() {
        let frame = SpriteFrame::solid(1, 1, [255; 4]);
        let mut canvas = DrawList::new(10.0, 10.0);
        canvas.draw_sprite(&sprite(&frame, false), Rect::new(0.0, 0.0, 1.0, 1.0));
        let mut batch = SpriteBatch::from_commands(canvas.commands());

        canvas.clear_commands();
        batch.rebuild(canvas.commands());
        assert!(batch.is_empty());
        assert!(batch.frames().is_empty());
        assert_eq!(batch.clear_color, Color::BLACK);
    }
}

//! egui layer drawn on top of the sprite pass.
//!
//! It does two jobs: it paints the text commands the game recorded into its
//! [`DrawList`], and, when toggled with F3, shows a stats window. The render
//! split follows egui-wgpu's requirements:
//!
//!   1. `prepare()` -- run egui, produce tessellated primitives
//!   2. `upload()`  -- update textures and buffers (borrows the encoder)
//!   3. `paint()`   -- render into a pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use curb_core::canvas::{Color, DrawCommand, DrawList};
use curb_core::time::TimeState;
use curb_core::transition::FadeState;
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub active_screen: Option<String>,
    pub fade_state: Option<FadeState>,
    pub fade_opacity: u8,
    pub subscribers: usize,
    pub entities: usize,
    pub draw_calls: usize,
    pub texture_binds: usize,
    pub quads: usize,
    pub cached_textures: usize,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    /// Returns true when egui wants the event for itself.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        self.visible && response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    /// `points_per_unit` converts canvas units into egui points.
    pub fn prepare(
        &mut self,
        window: &Window,
        canvas: &DrawList,
        points_per_unit: f32,
        time: &TimeState,
        stats: &OverlayStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let visible = self.visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            paint_canvas_text(ctx, canvas, points_per_unit);
            if visible {
                stats_window(ctx, time, stats);
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn paint_canvas_text(ctx: &egui::Context, canvas: &DrawList, points_per_unit: f32) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("canvas_text"),
    ));
    for command in canvas.commands() {
        if let DrawCommand::Text {
            text,
            bounds,
            size,
            color,
        } = command
        {
            painter.text(
                egui::pos2(bounds.x * points_per_unit, bounds.y * points_per_unit),
                egui::Align2::LEFT_TOP,
                text,
                egui::FontId::proportional(size * points_per_unit),
                to_color32(*color),
            );
        }
    }
}

fn stats_window(ctx: &egui::Context, time: &TimeState, stats: &OverlayStats) {
    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", time.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
            ui.label(format!("Ticks this frame: {}", time.ticks_this_frame));
            ui.label(format!("Total ticks: {}", time.tick_count));
            ui.label(format!("Frame: {}", time.frame_count));
            ui.separator();
            ui.label(format!(
                "Screen: {}",
                stats.active_screen.as_deref().unwrap_or("-")
            ));
            if let Some(fade) = stats.fade_state {
                ui.label(format!("Fade: {:?} ({})", fade, stats.fade_opacity));
            }
            ui.label(format!("Subscribers: {}", stats.subscribers));
            ui.label(format!("Entities: {}", stats.entities));
            ui.separator();
            ui.label(format!("Draw calls: {}", stats.draw_calls));
            ui.label(format!("Texture binds: {}", stats.texture_binds));
            ui.label(format!("Quads: {}", stats.quads));
            ui.label(format!("Cached textures: {}", stats.cached_textures));
        });
}

fn to_color32(color: Color) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_convert_to_bytes() {
        assert_eq!(to_color32(Color::WHITE), egui::Color32::WHITE);
        assert_eq!(
            to_color32(Color::BLACK.with_alpha(0.5)),
            egui::Color32::from_rgba_unmultiplied(0, 0, 0, 128)
        );
    }

    #[test]
    fn out_of_range_channels_saturate() {
        let c = to_color32(Color::rgb(2.0, -1.0, 0.0));
        assert_eq!(c, egui::Color32::from_rgb(255, 0, 0));
    }
}

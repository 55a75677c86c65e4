//! Curbside: main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Game logic runs
//! inside `RedrawRequested` on a fixed timestep (see `TimeState`):
//!
//!   1. `begin_frame()` measures the wall-clock delta and feeds the accumulator
//!   2. `while should_tick()` hands one input snapshot per tick to the director,
//!      which records the frame into a fresh `DrawList`
//!   3. The last recorded list is batched into sprite quads and drawn
//!   4. Text and the F3 stats window are composited through egui on top

mod character_select;
mod characters;
mod config;
mod main_menu;
mod main_scene;
mod menu;
mod objects;
mod screens;
mod settings_menu;
mod stage;

use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use curb_core::assets::{FsSpriteLoader, SpriteLoader};
use curb_core::canvas::DrawList;
use curb_core::director::Director;
use curb_core::input::{InputState, Key};
use curb_core::locale::JsonTextProvider;
use curb_core::settings::JsonSettingsStore;
use curb_core::time::TimeState;
use curb_devtools::{DebugOverlay, OverlayStats};
use curb_platform::{map_key, map_mouse_button, PlatformConfig};
use curb_render::{Camera2D, GpuContext, SpriteBatch, SpriteRenderer};
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::Cli;
use crate::screens::{Screens, MAIN_MENU};

/// Every screen lays itself out on this canvas; the window only scales it.
const VIRTUAL_WIDTH: f32 = 1280.0;
const VIRTUAL_HEIGHT: f32 = 720.0;

struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    camera: Camera2D,
    renderer: SpriteRenderer,
    batch: SpriteBatch,
    debug_overlay: DebugOverlay,
    time: TimeState,
    input: InputState,
    director: Director<Screens>,
    canvas: DrawList,
}

impl EngineState {
    fn new(window: Arc<Window>, cli: &Cli) -> Result<Self, String> {
        let gpu = GpuContext::new(Arc::clone(&window)).map_err(|e| e.to_string())?;
        let mut camera = Camera2D::new(VIRTUAL_WIDTH, VIRTUAL_HEIGHT);
        camera.viewport = gpu.size;
        let renderer = SpriteRenderer::new(&gpu, &camera);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let view = Vec2::new(VIRTUAL_WIDTH, VIRTUAL_HEIGHT);
        let loader: Rc<dyn SpriteLoader> = Rc::new(FsSpriteLoader::new(&cli.assets));
        let screens = Screens::new(loader, characters::registry(), cli.stage_path(), view);
        let mut director = Director::new(
            screens,
            Box::new(JsonSettingsStore::new(&cli.settings)),
            Box::new(JsonTextProvider::new(cli.locales_dir())),
            cli.fade_step,
        );
        director
            .start(MAIN_MENU)
            .map_err(|e| format!("Cannot open the main menu: {e}"))?;

        log::info!(
            "Assets from {}, settings in {}",
            cli.assets.display(),
            cli.settings.display()
        );

        Ok(Self {
            window,
            gpu,
            camera,
            renderer,
            batch: SpriteBatch::new(),
            debug_overlay,
            time: TimeState::new(),
            input: InputState::new(),
            director,
            canvas: DrawList::new(VIRTUAL_WIDTH, VIRTUAL_HEIGHT),
        })
    }

    fn overlay_stats(&self) -> OverlayStats {
        let scheduler = self.director.scheduler();
        OverlayStats {
            active_screen: self.director.active_screen().map(str::to_string),
            fade_state: Some(self.director.fade_state()),
            fade_opacity: self.director.fade_opacity(),
            subscribers: scheduler.len(),
            entities: scheduler.entity_count(),
            draw_calls: self.batch.draw_calls.len(),
            texture_binds: self.batch.texture_binds(),
            quads: self.batch.quad_count(),
            cached_textures: self.renderer.texture_count(),
        }
    }

    /// egui points per canvas unit at the current window size.
    fn points_per_unit(&self) -> f32 {
        let pixels_per_point = self.window.scale_factor() as f32;
        self.gpu.size.0 as f32 / VIRTUAL_WIDTH / pixels_per_point
    }

    fn render(&mut self) {
        self.renderer.prepare(&self.gpu, &self.camera, &self.batch);

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let points_per_unit = self.points_per_unit();
        let (egui_primitives, egui_textures_delta) = self.debug_overlay.prepare(
            &self.window,
            &self.canvas,
            points_per_unit,
            &self.time,
            &stats,
        );
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, &self.batch);

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    cli: Cli,
    config: PlatformConfig,
    state: Option<EngineState>,
    failed: bool,
}

impl App {
    fn new(cli: Cli) -> Self {
        let config = PlatformConfig {
            width: cli.width,
            height: cli.height,
            ..PlatformConfig::default()
        };
        Self {
            cli,
            config,
            state: None,
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: &str) {
        log::error!("{message}");
        self.failed = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = match curb_platform::create_window(event_loop, &self.config) {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, &format!("Failed to create window: {e}")),
        };
        match EngineState::new(window, &self.cli) {
            Ok(state) => self.state = Some(state),
            Err(e) => self.fail(event_loop, &format!("Startup failed: {e}")),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } if !egui_consumed => {
                if let Some(btn) = map_mouse_button(button) {
                    match button_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_position = state
                    .camera
                    .screen_to_virtual(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                state.time.begin_frame();
                while state.time.should_tick() {
                    if state.input.is_just_pressed(Key::F3) {
                        state.debug_overlay.toggle();
                    }

                    let input = state.input.snapshot(state.time.dt());
                    state.canvas = DrawList::new(VIRTUAL_WIDTH, VIRTUAL_HEIGHT);
                    state.director.frame(&input, &mut state.canvas);
                    // Edges belong to the first tick; a zero-tick frame keeps them
                    state.input.end_frame();
                    if state.director.should_quit() {
                        log::info!("Quit from menu, exiting.");
                        event_loop.exit();
                        return;
                    }
                }

                if state.time.ticks_this_frame > 0 {
                    state.batch.rebuild(state.canvas.commands());
                }

                state.render();
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Curbside starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(cli);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
        std::process::exit(1);
    }
    if app.failed {
        std::process::exit(1);
    }
}

use std::collections::HashMap;

use curb_core::canvas::Color;
use wgpu::util::DeviceExt;

use crate::batch::{BatchKey, SpriteBatch};
use crate::camera::Camera2D;
use crate::gpu_context::GpuContext;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::Texture;
use crate::vertex::SpriteVertex;

/// Frames a cached texture may go unused before it is dropped.
const TEXTURE_IDLE_FRAMES: u64 = 600;

struct GpuSpriteTexture {
    _texture: Texture,
    bind_group: wgpu::BindGroup,
    last_used: u64,
}

/// Owns the sprite pipeline and everything it draws from: the camera
/// uniform, the growable mesh buffers and a texture per sprite frame.
pub struct SpriteRenderer {
    pipeline: SpritePipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    white: GpuSpriteTexture,
    textures: HashMap<u64, GpuSpriteTexture>,
    frame_counter: u64,
}

impl SpriteRenderer {
    pub fn new(gpu: &GpuContext, camera: &Camera2D) -> Self {
        let device = &gpu.device;
        let pipeline = SpritePipeline::new(device, gpu.surface_format);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera.build_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let white_texture = Texture::white(device, &gpu.queue);
        let white = GpuSpriteTexture {
            bind_group: pipeline.create_texture_bind_group(device, &white_texture),
            _texture: white_texture,
            last_used: 0,
        };

        let vertex_capacity = 256;
        let index_capacity = 384;
        Self {
            vertex_buffer: create_vertex_buffer(device, vertex_capacity),
            index_buffer: create_index_buffer(device, index_capacity),
            pipeline,
            camera_buffer,
            camera_bind_group,
            vertex_capacity,
            index_capacity,
            white,
            textures: HashMap::new(),
            frame_counter: 0,
        }
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Upload everything `batch` needs: camera, new frame textures and the
    /// mesh. Textures left unused for a while are released.
    pub fn prepare(&mut self, gpu: &GpuContext, camera: &Camera2D, batch: &SpriteBatch) {
        self.frame_counter += 1;
        let now = self.frame_counter;

        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.build_uniform()]),
        );

        for frame in batch.frames() {
            let pipeline = &self.pipeline;
            let entry = self.textures.entry(frame.id()).or_insert_with(|| {
                let texture = Texture::from_image(
                    &gpu.device,
                    &gpu.queue,
                    frame.image(),
                    "Sprite Frame Texture",
                );
                GpuSpriteTexture {
                    bind_group: pipeline.create_texture_bind_group(&gpu.device, &texture),
                    _texture: texture,
                    last_used: now,
                }
            });
            entry.last_used = now;
        }

        let before = self.textures.len();
        self.textures
            .retain(|_, tex| now - tex.last_used <= TEXTURE_IDLE_FRAMES);
        let evicted = before - self.textures.len();
        if evicted > 0 {
            log::debug!("Released {evicted} idle sprite textures");
        }

        self.ensure_mesh_capacity(&gpu.device, batch.vertices.len(), batch.indices.len());
        if !batch.vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&batch.vertices));
            gpu.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&batch.indices));
        }
    }

    fn ensure_mesh_capacity(&mut self, device: &wgpu::Device, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }
    }

    /// Record the batch into a render pass that clears to the batch's background.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, batch: &SpriteBatch) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(batch.clear_color)),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        if batch.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut last_bound: Option<BatchKey> = None;
        for draw in &batch.draw_calls {
            let texture = match draw.key {
                BatchKey::White => Some(&self.white),
                BatchKey::Frame(id) => self.textures.get(&id),
            };
            let Some(texture) = texture else {
                log::warn!("No texture uploaded for {:?}", draw.key);
                continue;
            };
            if last_bound != Some(draw.key) {
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                last_bound = Some(draw.key);
            }
            render_pass.draw_indexed(draw.index_start..(draw.index_start + draw.index_count), 0, 0..1);
        }
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(color.r),
        g: f64::from(color.g),
        b: f64::from(color.b),
        a: f64::from(color.a),
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

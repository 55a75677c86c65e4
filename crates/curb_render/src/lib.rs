pub mod batch;
pub mod camera;
pub mod gpu_context;
pub mod renderer;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use batch::{BatchKey, DrawCall, SpriteBatch};
pub use camera::{Camera2D, CameraUniform};
pub use gpu_context::{GpuContext, RenderError};
pub use renderer::SpriteRenderer;
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::SpriteVertex;

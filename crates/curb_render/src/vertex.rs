use curb_core::canvas::Rect;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    /// Corners of `dest` in top-left, top-right, bottom-right, bottom-left
    /// order. A mirrored quad swaps the horizontal texture coordinates.
    pub fn quad(dest: Rect, flipped: bool, color: [f32; 4]) -> [SpriteVertex; 4] {
        let (u0, u1) = if flipped { (1.0, 0.0) } else { (0.0, 1.0) };
        let (left, top) = (dest.x, dest.y);
        let (right, bottom) = (dest.x + dest.w, dest.y + dest.h);
        [
            SpriteVertex {
                position: [left, top],
                tex_coords: [u0, 0.0],
                color,
            },
            SpriteVertex {
                position: [right, top],
                tex_coords: [u1, 0.0],
                color,
            },
            SpriteVertex {
                position: [right, bottom],
                tex_coords: [u1, 1.0],
                color,
            },
            SpriteVertex {
                position: [left, bottom],
                tex_coords: [u0, 1.0],
                color,
            },
        ]
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, color) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

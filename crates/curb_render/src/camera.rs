use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Screen-space camera over a fixed virtual resolution. The origin is the
/// top-left corner and y grows downwards, matching the canvas the game
/// draws into. The window size only decides how that area is stretched.
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    pub virtual_size: Vec2,
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(virtual_width: f32, virtual_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            virtual_size: Vec2::new(virtual_width, virtual_height),
            viewport: (virtual_width as u32, virtual_height as u32),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let extent = self.virtual_size / self.zoom.max(f32::EPSILON);
        let proj = Mat4::orthographic_rh(
            self.position.x,
            self.position.x + extent.x,
            self.position.y + extent.y,
            self.position.y,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }

    /// Map a physical cursor position into virtual canvas coordinates.
    pub fn screen_to_virtual(&self, physical: Vec2) -> Vec2 {
        let (w, h) = self.viewport;
        if w == 0 || h == 0 {
            return physical;
        }
        let scale = self.virtual_size / Vec2::new(w as f32, h as f32);
        self.position + physical * scale / self.zoom.max(f32::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(camera: &Camera2D, x: f32, y: f32) -> Vec2 {
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let clip = m * Vec4::new(x, y, 0.0, 1.0);
        Vec2::new(clip.x, clip.y)
    }

    #[test]
    fn top_left_maps_to_upper_left_clip_corner() {
        let camera = Camera2D::new(1280.0, 720.0);
        let corner = project(&camera, 0.0, 0.0);
        assert!((corner.x + 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
        let far = project(&camera, 1280.0, 720.0);
        assert!((far.x - 1.0).abs() < 1e-5);
        assert!((far.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn cursor_scales_with_window_size() {
        let mut camera = Camera2D::new(1280.0, 720.0);
        camera.viewport = (640, 360);
        assert_eq!(
            camera.screen_to_virtual(Vec2::new(320.0, 180.0)),
            Vec2::new(640.0, 360.0)
        );
    }
}

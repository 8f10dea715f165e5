//! Mapping from simulation meters to window pixels

use glam::DVec2;

/// Affine map `pixel = position * scale + screen_center`.
///
/// Pixel y grows downward, so positive simulation y ends up below the
/// center of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    /// Pixels per meter
    pub scale: f64,
    pub width: u32,
    pub height: u32,
}

impl ScreenTransform {
    pub fn new(scale: f64, width: u32, height: u32) -> Self {
        Self {
            scale,
            width,
            height,
        }
    }

    pub fn to_screen(&self, position: DVec2) -> [f32; 2] {
        let x = position.x * self.scale + self.width as f64 / 2.0;
        let y = position.y * self.scale + self.height as f64 / 2.0;
        [x as f32, y as f32]
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Scale about the screen center
    pub fn zoom(&mut self, factor: f64) {
        self.scale *= factor;
    }
}

/// Screen size uniform used to turn pixels into clip space
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenUniform {
    pub size: [f32; 2],
    pub _padding: [f32; 2],
}

impl ScreenUniform {
    pub fn from_transform(transform: &ScreenTransform) -> Self {
        Self {
            size: [transform.width as f32, transform.height as f32],
            _padding: [0.0; 2],
        }
    }
}

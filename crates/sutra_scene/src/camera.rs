//! Perspective camera sized from a viewport.

use crate::descriptor::CameraPlacement;
use glam::{Mat4, Vec3};

#[derive(Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl Camera {
    /// Zero-size viewports are clamped before the aspect ratio is
    /// computed, so a collapsed container can never divide by zero.
    pub fn new(placement: &CameraPlacement, width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: placement.eye,
            target: placement.target,
            up: Vec3::Y,
            fov_y_deg: placement.fov_y_deg,
            near: 0.1,
            far: 100.0,
            aspect: 1.0,
        };
        camera.set_viewport(width, height);
        camera
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        self.aspect = width / height;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }
}

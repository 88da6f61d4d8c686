//! Camera model that fills the per-frame camera block

use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};

use crate::schema::{common, uniforms, CameraBlock, LayoutSchema};

/// Camera projection type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Projection::Perspective {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Projection::Orthographic {
            left: -half_w,
            right: half_w,
            bottom: -half_h,
            top: half_h,
            near,
            far,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y, aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Mat4::orthographic_rh(left, right, bottom, top, near, far),
        }
    }

    pub fn near(&self) -> f32 {
        match self {
            Projection::Perspective { near, .. } => *near,
            Projection::Orthographic { near, .. } => *near,
        }
    }

    pub fn far(&self) -> f32 {
        match self {
            Projection::Perspective { far, .. } => *far,
            Projection::Orthographic { far, .. } => *far,
        }
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self, Projection::Orthographic { .. })
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if let Projection::Perspective { aspect: a, .. } = self {
            *a = aspect;
        }
    }

    /// Half width and half height of the far plane, and the far distance.
    pub fn frustum_size(&self) -> Vec3 {
        match *self {
            Projection::Perspective {
                fov_y, aspect, far, ..
            } => {
                let half_h = far * (fov_y * 0.5).tan();
                Vec3::new(half_h * aspect, half_h, far)
            }
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                far,
                ..
            } => Vec3::new((right - left) * 0.5, (top - bottom) * 0.5, far),
        }
    }
}

/// Per-frame inputs that do not come from the camera itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameParams {
    /// G-buffer / render target size in pixels.
    pub target_size: UVec2,
    /// Opaque depth reconstruction vector for the "uniforms" schema.
    pub depth_mode: Vec4,
    /// Opaque G-buffer offset vector for the "uniforms" schema.
    pub gbuffer_offsets: Vec4,
}

impl FrameParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target_size: UVec2::new(width, height),
            ..Default::default()
        }
    }

    pub fn with_depth_mode(mut self, depth_mode: Vec4) -> Self {
        self.depth_mode = depth_mode;
        self
    }

    pub fn with_gbuffer_offsets(mut self, gbuffer_offsets: Vec4) -> Self {
        self.gbuffer_offsets = gbuffer_offsets;
        self
    }

    /// Reciprocal of the target size. A zero dimension yields 0.
    pub fn inv_size(&self) -> Vec2 {
        if self.target_size.x == 0 || self.target_size.y == 0 {
            log::warn!(
                "Render target has zero extent {}x{}",
                self.target_size.x,
                self.target_size.y
            );
        }
        let inv = |v: u32| if v == 0 { 0.0 } else { 1.0 / v as f32 };
        Vec2::new(inv(self.target_size.x), inv(self.target_size.y))
    }
}

/// Camera for viewing the scene
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
    /// Negate clip-space Y (Vulkan convention).
    pub flip_y: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, -50.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::default(),
            flip_y: false,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    /// Update aspect ratio for perspective projection
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.projection.set_aspect(width / height);
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        let mut proj = self.projection.matrix();
        if self.flip_y {
            proj.y_axis.y = -proj.y_axis.y;
        }
        proj
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera block in the "common" schema.
    pub fn common_data(&self, frame: &FrameParams) -> common::CameraData {
        let view = self.view_matrix();

        common::CameraData {
            view,
            view_inv: view.inverse(),
            view_proj: self.projection_matrix() * view,
            camera_pos: self.position,
            _pad0: 0.0,
            gbuffer_inv_size: frame.inv_size(),
            near_clip: self.projection.near(),
            far_clip: self.projection.far(),
        }
    }

    /// Camera block in the "uniforms" schema.
    pub fn uniforms_data(&self, frame: &FrameParams) -> uniforms::CameraData {
        let view = self.view_matrix();

        uniforms::CameraData {
            view,
            view_inv: view.inverse(),
            view_proj: self.projection_matrix() * view,
            camera_pos: self.position,
            near_clip: self.projection.near(),
            frustum_size: self.projection.frustum_size(),
            far_clip: self.projection.far(),
            depth_mode: frame.depth_mode,
            gbuffer_offsets: frame.gbuffer_offsets,
        }
    }

    /// Camera block in whichever schema the rendering path uses.
    pub fn camera_block(&self, schema: LayoutSchema, frame: &FrameParams) -> CameraBlock {
        match schema {
            LayoutSchema::Common => self.common_data(frame).into(),
            LayoutSchema::Uniforms => self.uniforms_data(frame).into(),
        }
    }
}

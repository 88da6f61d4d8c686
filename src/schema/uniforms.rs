//! "Uniforms" schema: camera block packing scalars into the tail of each
//! `vec3`, plus opaque depth-mode and G-buffer offset vectors.

use glam::{Mat4, Vec3, Vec4};
use static_assertions::{assert_impl_all, const_assert_eq};

use crate::layout::uniform_block;

uniform_block! {
    /// Per-frame camera constants.
    pub struct CameraData as "CameraData" {
        pub view: Mat4 => Mat4,            // +0 (size: 64)
        pub view_inv: Mat4 => Mat4,        // +64 (size: 64)
        pub view_proj: Mat4 => Mat4,       // +128 (size: 64)
        pub camera_pos: Vec3 => Vec3,      // +192 (size: 12)
        pub near_clip: f32 => Float,       // +204 (size: 4)
        /// Far-plane half extents (x, y) and far distance (z).
        pub frustum_size: Vec3 => Vec3,    // +208 (size: 12)
        pub far_clip: f32 => Float,        // +220 (size: 4)
        /// Depth reconstruction parameters, passed through unchanged.
        pub depth_mode: Vec4 => Vec4,      // +224 (size: 16)
        /// G-buffer sampling offsets, passed through unchanged.
        pub gbuffer_offsets: Vec4 => Vec4, // +240 (size: 16)
    }
}

uniform_block! {
    /// Per-draw object constants.
    pub struct ObjectData as "ObjectData" {
        pub model: Mat4 => Mat4,     // +0 (size: 64)
        pub u_offset: Vec4 => Vec4,  // +64 (size: 16)
        pub v_offset: Vec4 => Vec4,  // +80 (size: 16)
        pub u_offset1: Vec4 => Vec4, // +96 (size: 16)
        pub v_offset1: Vec4 => Vec4, // +112 (size: 16)
    }
}

const_assert_eq!(std::mem::size_of::<CameraData>(), 256);
const_assert_eq!(std::mem::offset_of!(CameraData, near_clip), 204);
const_assert_eq!(std::mem::offset_of!(CameraData, far_clip), 220);
const_assert_eq!(std::mem::size_of::<ObjectData>(), 128);
const_assert_eq!(std::mem::offset_of!(ObjectData, model), 0);

assert_impl_all!(CameraData: bytemuck::Pod, Send, Sync);
assert_impl_all!(ObjectData: bytemuck::Pod, Send, Sync);

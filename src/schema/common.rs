//! "Common" schema: camera block with explicit `vec3` padding and
//! `GBufferInvSize`, object block with two numbered UV sets.

use glam::{Mat4, Vec2, Vec3, Vec4};
use static_assertions::{assert_impl_all, const_assert_eq};

use crate::layout::uniform_block;

uniform_block! {
    /// Per-frame camera constants.
    pub struct CameraData as "CameraData" {
        pub view: Mat4 => Mat4,             // +0 (size: 64)
        pub view_inv: Mat4 => Mat4,         // +64 (size: 64)
        pub view_proj: Mat4 => Mat4,        // +128 (size: 64)
        pub camera_pos: Vec3 => Vec3,       // +192 (size: 12)
        pub _pad0: f32 => Float,            // +204 (size: 4)
        /// Reciprocal of the G-buffer size in pixels.
        pub gbuffer_inv_size: Vec2 => Vec2, // +208 (size: 8)
        pub near_clip: f32 => Float,        // +216 (size: 4)
        pub far_clip: f32 => Float,         // +220 (size: 4)
    }
}

uniform_block! {
    /// Per-draw object constants.
    pub struct ObjectData as "ObjectData" {
        pub model: Mat4 => Mat4,     // +0 (size: 64)
        pub u_offset0: Vec4 => Vec4, // +64 (size: 16)
        pub v_offset0: Vec4 => Vec4, // +80 (size: 16)
        pub u_offset1: Vec4 => Vec4, // +96 (size: 16)
        pub v_offset1: Vec4 => Vec4, // +112 (size: 16)
    }
}

const_assert_eq!(std::mem::size_of::<CameraData>(), 224);
const_assert_eq!(std::mem::offset_of!(CameraData, camera_pos), 192);
const_assert_eq!(std::mem::offset_of!(CameraData, gbuffer_inv_size), 208);
const_assert_eq!(std::mem::size_of::<ObjectData>(), 128);
const_assert_eq!(std::mem::offset_of!(ObjectData, model), 0);

assert_impl_all!(CameraData: bytemuck::Pod, Send, Sync);
assert_impl_all!(ObjectData: bytemuck::Pod, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FieldType, UniformBlock};

    fn offsets(fields: &[crate::layout::FieldDesc]) -> Vec<(&'static str, u32)> {
        fields.iter().map(|f| (f.name, f.offset)).collect()
    }

    #[test]
    fn test_camera_layout_table() {
        let layout = CameraData::LAYOUT;
        assert_eq!(layout.name, "CameraData");
        assert_eq!(layout.size, 224);
        assert_eq!(
            offsets(layout.fields),
            vec![
                ("view", 0),
                ("view_inv", 64),
                ("view_proj", 128),
                ("camera_pos", 192),
                ("_pad0", 204),
                ("gbuffer_inv_size", 208),
                ("near_clip", 216),
                ("far_clip", 220),
            ]
        );
        assert!(layout.check().is_ok());
    }

    #[test]
    fn test_camera_pos_follows_view_proj() {
        let layout = CameraData::LAYOUT;
        let view_proj = layout.field("view_proj").unwrap();
        let camera_pos = layout.field("camera_pos").unwrap();
        let pad = layout.field("_pad0").unwrap();

        assert_eq!(camera_pos.offset, view_proj.end());
        assert_eq!(pad.offset, camera_pos.end());
        assert!(pad.is_padding());
        assert_eq!(pad.ty, FieldType::Float);
    }

    #[test]
    fn test_object_layout_table() {
        let layout = ObjectData::LAYOUT;
        assert_eq!(layout.size, 128);
        assert_eq!(
            offsets(layout.fields),
            vec![
                ("model", 0),
                ("u_offset0", 64),
                ("v_offset0", 80),
                ("u_offset1", 96),
                ("v_offset1", 112),
            ]
        );
    }

    #[test]
    fn test_bytes_land_at_table_offsets() {
        let mut data: CameraData = bytemuck::Zeroable::zeroed();
        data.near_clip = 0.5;
        data.far_clip = 250.0;

        let bytes = data.as_bytes();
        assert_eq!(bytes.len(), 224);
        assert_eq!(&bytes[216..220], &0.5f32.to_ne_bytes());
        assert_eq!(&bytes[220..224], &250.0f32.to_ne_bytes());
    }
}

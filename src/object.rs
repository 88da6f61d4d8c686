//! Per-draw object constants.

use glam::{Mat4, Vec2, Vec4};

use crate::schema::{common, uniforms, LayoutSchema, ObjectBlock};

/// Texture-coordinate transform for one UV set.
///
/// The shader computes `u' = dot(uv, u_offset.xy) + u_offset.w` and the same
/// for `v` with `v_offset`, which covers scale, shear and translation into an
/// atlas sub-rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    pub u_offset: Vec4,
    pub v_offset: Vec4,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UvTransform {
    pub const IDENTITY: Self = Self {
        u_offset: Vec4::new(1.0, 0.0, 0.0, 0.0),
        v_offset: Vec4::new(0.0, 1.0, 0.0, 0.0),
    };

    /// Map the unit square onto the atlas rectangle at `offset` with extent `scale`.
    pub fn from_atlas_rect(offset: Vec2, scale: Vec2) -> Self {
        Self {
            u_offset: Vec4::new(scale.x, 0.0, 0.0, offset.x),
            v_offset: Vec4::new(0.0, scale.y, 0.0, offset.y),
        }
    }

    /// Host-side evaluation of the shader transform.
    pub fn apply(&self, uv: Vec2) -> Vec2 {
        Vec2::new(
            uv.dot(self.u_offset.truncate().truncate()) + self.u_offset.w,
            uv.dot(self.v_offset.truncate().truncate()) + self.v_offset.w,
        )
    }
}

/// A drawable's world transform and up to two UV set transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawObject {
    pub model: Mat4,
    pub uv_sets: [UvTransform; 2],
}

impl Default for DrawObject {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            uv_sets: [UvTransform::IDENTITY; 2],
        }
    }
}

impl DrawObject {
    pub fn new(model: Mat4) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    /// Replace the transform of UV set `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not 0 or 1.
    pub fn with_uv_set(mut self, index: usize, transform: UvTransform) -> Self {
        self.uv_sets[index] = transform;
        self
    }

    /// Object block in the "common" schema.
    pub fn common_data(&self) -> common::ObjectData {
        let [uv0, uv1] = self.uv_sets;
        common::ObjectData {
            model: self.model,
            u_offset0: uv0.u_offset,
            v_offset0: uv0.v_offset,
            u_offset1: uv1.u_offset,
            v_offset1: uv1.v_offset,
        }
    }

    /// Object block in the "uniforms" schema.
    pub fn uniforms_data(&self) -> uniforms::ObjectData {
        let [uv0, uv1] = self.uv_sets;
        uniforms::ObjectData {
            model: self.model,
            u_offset: uv0.u_offset,
            v_offset: uv0.v_offset,
            u_offset1: uv1.u_offset,
            v_offset1: uv1.v_offset,
        }
    }

    pub fn object_block(&self, schema: LayoutSchema) -> ObjectBlock {
        match schema {
            LayoutSchema::Common => self.common_data().into(),
            LayoutSchema::Uniforms => self.uniforms_data().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_identity_leaves_uv_unchanged() {
        let uv = Vec2::new(0.25, 0.75);
        assert_eq!(UvTransform::IDENTITY.apply(uv), uv);
    }

    #[test]
    fn test_atlas_rect_maps_unit_square() {
        let rect = UvTransform::from_atlas_rect(Vec2::new(0.5, 0.25), Vec2::new(0.5, 0.25));
        assert_eq!(rect.apply(Vec2::ZERO), Vec2::new(0.5, 0.25));
        assert_eq!(rect.apply(Vec2::ONE), Vec2::new(1.0, 0.5));
    }

    #[test]
    fn test_both_schemas_carry_the_same_bytes() {
        let object = DrawObject::new(Mat4::from_translation(Vec3::new(15.0, 0.0, 30.0)))
            .with_uv_set(1, UvTransform::from_atlas_rect(Vec2::splat(0.5), Vec2::splat(0.5)));

        let common = object.object_block(LayoutSchema::Common);
        let uniforms = object.object_block(LayoutSchema::Uniforms);
        assert_eq!(common.as_bytes(), uniforms.as_bytes());
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_with_uv_set_out_of_range_panics() {
        let _ = DrawObject::default().with_uv_set(2, UvTransform::IDENTITY);
    }

    #[test]
    fn test_uv_sets_land_in_their_fields() {
        let uv1 = UvTransform::from_atlas_rect(Vec2::new(0.1, 0.2), Vec2::new(0.3, 0.4));
        let data = DrawObject::default().with_uv_set(1, uv1).common_data();

        assert_eq!(data.model, Mat4::IDENTITY);
        assert_eq!(data.u_offset0, UvTransform::IDENTITY.u_offset);
        assert_eq!(data.u_offset1, uv1.u_offset);
        assert_eq!(data.v_offset1, uv1.v_offset);
    }
}

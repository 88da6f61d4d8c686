//! Uniform Layouts - host/shader memory contracts for camera and object constants
//!
//! Rendering code uploads two uniform blocks:
//! - **CameraData**: written once per frame (view/projection matrices, camera
//!   position, clip planes and G-buffer parameters)
//! - **ObjectData**: written once per draw (model matrix and atlas UV transforms)
//!
//! Both exist in two schemas selected by [`LayoutSchema`]. Each host struct is
//! declared together with a field-offset table that is checked at compile time
//! for std140 packing, and the same table generates WGSL/GLSL declarations and
//! verifies shader source through naga reflection.
//!
//! # Features
//! - `#[repr(C)]` + `bytemuck::Pod` host structs, uploadable byte-for-byte
//! - Compile-time size and offset assertions
//! - WGSL and GLSL declaration generation and reflection-based verification
//! - Camera and draw-object helpers filling either schema
//! - Host staging arena for dynamic per-draw uniform offsets

pub mod camera;
pub mod error;
pub mod layout;
pub mod object;
pub mod schema;
pub mod shader;
pub mod staging;

pub use camera::{Camera, FrameParams, Projection};
pub use error::{LayoutError, LayoutResult};
pub use layout::{BlockLayout, FieldDesc, FieldType, UniformBlock};
pub use object::{DrawObject, UvTransform};
pub use schema::{CameraBlock, LayoutSchema, ObjectBlock};
pub use shader::BindingSlot;
pub use staging::{UniformAllocation, UniformArena};

/// Configuration for a rendering path's uniform blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformConfig {
    /// Which block layouts the shaders expect
    pub schema: LayoutSchema,
    /// Where the per-frame camera block is bound
    pub camera_slot: BindingSlot,
    /// Where the per-draw object block is bound (dynamic offset)
    pub object_slot: BindingSlot,
    /// Device `minUniformBufferOffsetAlignment`, a power of 2
    pub min_uniform_offset_alignment: u64,
    /// Size of the per-draw staging arena in bytes
    pub object_arena_capacity: u64,
}

impl Default for UniformConfig {
    fn default() -> Self {
        Self {
            schema: LayoutSchema::Common,
            camera_slot: BindingSlot::new(0, 0),
            object_slot: BindingSlot::new(0, 1),
            min_uniform_offset_alignment: UniformArena::DEFAULT_ALIGNMENT,
            object_arena_capacity: 64 * 1024,
        }
    }
}

impl UniformConfig {
    pub fn with_schema(schema: LayoutSchema) -> Self {
        Self {
            schema,
            ..Default::default()
        }
    }
}

//! Field-offset tables for uniform blocks.
//!
//! Every host-side uniform struct carries a [`BlockLayout`]: an ordered table
//! of `(name, type, offset)` entries plus the total block size. The table is
//! produced by the `uniform_block!` macro from the struct declaration itself,
//! so the offsets are the ones the Rust compiler actually assigned. The same
//! table drives shader declaration generation and the reflection checks in
//! [`crate::shader`].
//!
//! Packing follows std140, which for the types used here is identical to the
//! WGSL uniform address space rules:
//!
//! | type  | size | align |
//! |-------|------|-------|
//! | float | 4    | 4     |
//! | vec2  | 8    | 8     |
//! | vec3  | 12   | 16    |
//! | vec4  | 16   | 16    |
//! | mat4  | 64   | 16    |
//!
//! Block sizes are rounded up to 16 bytes.

use std::fmt;

use crate::error::{LayoutError, LayoutResult};

/// Alignment of a uniform block as a whole.
pub const BLOCK_ALIGNMENT: u32 = 16;

/// Element type of a uniform block field. All components are 32-bit floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl FieldType {
    pub const fn size(self) -> u32 {
        match self {
            FieldType::Float => 4,
            FieldType::Vec2 => 8,
            FieldType::Vec3 => 12,
            FieldType::Vec4 => 16,
            FieldType::Mat4 => 64,
        }
    }

    pub const fn align(self) -> u32 {
        match self {
            FieldType::Float => 4,
            FieldType::Vec2 => 8,
            FieldType::Vec3 | FieldType::Vec4 | FieldType::Mat4 => 16,
        }
    }

    pub const fn wgsl_name(self) -> &'static str {
        match self {
            FieldType::Float => "f32",
            FieldType::Vec2 => "vec2<f32>",
            FieldType::Vec3 => "vec3<f32>",
            FieldType::Vec4 => "vec4<f32>",
            FieldType::Mat4 => "mat4x4<f32>",
        }
    }

    pub const fn glsl_name(self) -> &'static str {
        match self {
            FieldType::Float => "float",
            FieldType::Vec2 => "vec2",
            FieldType::Vec3 => "vec3",
            FieldType::Vec4 => "vec4",
            FieldType::Mat4 => "mat4",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl_name())
    }
}

/// One entry of a block's field-offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDesc {
    /// Field name, shared by the host struct and the shader declaration.
    pub name: &'static str,
    pub ty: FieldType,
    /// Byte offset from the start of the block.
    pub offset: u32,
}

impl FieldDesc {
    /// Offset one past the last byte of this field.
    pub const fn end(&self) -> u32 {
        self.offset + self.ty.size()
    }

    /// Alignment padding fields are named with a leading underscore.
    pub fn is_padding(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// Ordered field-offset table of a uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// Block (struct) name used on the shader side.
    pub name: &'static str,
    pub fields: &'static [FieldDesc],
    /// Total size in bytes, including trailing padding.
    pub size: u32,
}

impl BlockLayout {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether every offset and the block size follow std140 packing.
    ///
    /// Usable in constant context; `uniform_block!` asserts it at compile time.
    pub const fn is_std140(&self) -> bool {
        let mut cursor = 0;
        let mut i = 0;
        while i < self.fields.len() {
            let field = &self.fields[i];
            let expected = align_up(cursor, field.ty.align());
            if field.offset != expected {
                return false;
            }
            cursor = expected + field.ty.size();
            i += 1;
        }
        align_up(cursor, BLOCK_ALIGNMENT) == self.size
    }

    /// The std140 offsets for this block's field types, in declaration order.
    pub fn std140_offsets(&self) -> Vec<u32> {
        std140_offsets(self.fields.iter().map(|f| f.ty))
    }

    /// Runtime counterpart of [`is_std140`](Self::is_std140) reporting the
    /// first offending field.
    pub fn check(&self) -> LayoutResult<()> {
        let mut cursor = 0;
        for field in self.fields {
            let expected = align_up(cursor, field.ty.align());
            if field.offset != expected {
                return Err(LayoutError::FieldOffset {
                    block: self.name.to_string(),
                    field: field.name.to_string(),
                    expected,
                    actual: field.offset,
                });
            }
            cursor = expected + field.ty.size();
        }

        let expected = align_up(cursor, BLOCK_ALIGNMENT);
        if expected != self.size {
            return Err(LayoutError::BlockSize {
                block: self.name.to_string(),
                expected,
                actual: self.size,
            });
        }
        Ok(())
    }
}

/// Compute std140 offsets for a sequence of field types.
pub fn std140_offsets(types: impl IntoIterator<Item = FieldType>) -> Vec<u32> {
    let mut cursor = 0;
    types
        .into_iter()
        .map(|ty| {
            let offset = align_up(cursor, ty.align());
            cursor = offset + ty.size();
            offset
        })
        .collect()
}

pub const fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}

/// A host-side struct that can be copied verbatim into a uniform buffer.
pub trait UniformBlock: bytemuck::Pod {
    const LAYOUT: &'static BlockLayout;

    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Declare a `#[repr(C)]` uniform struct together with its [`BlockLayout`].
///
/// Each field is annotated with its [`FieldType`]. The expansion fails to
/// compile if a Rust field type has a different size than its annotation or
/// if the resulting offsets are not std140-packed.
///
/// ```ignore
/// uniform_block! {
///     pub struct Example as "Example" {
///         pub model: Mat4 => Mat4,
///         pub tint: Vec3 => Vec3,
///         pub _pad0: f32 => Float,
///     }
/// }
/// ```
macro_rules! uniform_block {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $block:literal {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty => $kind:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, ::bytemuck::Pod, ::bytemuck::Zeroable)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::layout::UniformBlock for $name {
            const LAYOUT: &'static $crate::layout::BlockLayout = &$crate::layout::BlockLayout {
                name: $block,
                fields: &[
                    $(
                        $crate::layout::FieldDesc {
                            name: stringify!($field),
                            ty: $crate::layout::FieldType::$kind,
                            offset: ::core::mem::offset_of!($name, $field) as u32,
                        },
                    )*
                ],
                size: ::core::mem::size_of::<$name>() as u32,
            };
        }

        const _: () = {
            $(
                assert!(
                    ::core::mem::size_of::<$fty>() as u32
                        == $crate::layout::FieldType::$kind.size(),
                    concat!(stringify!($name), ".", stringify!($field), " has the wrong size"),
                );
            )*
            assert!(
                <$name as $crate::layout::UniformBlock>::LAYOUT.is_std140(),
                concat!(stringify!($name), " is not std140-packed"),
            );
        };
    };
}

pub(crate) use uniform_block;

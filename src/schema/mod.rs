//! Versioned uniform schemas.
//!
//! Two rendering paths consume the same conceptual camera and object data
//! through different shader contracts. [`LayoutSchema`] selects which one a
//! path uses; each tag maps to exactly one pair of field-offset tables.

pub mod common;
pub mod uniforms;

use std::fmt;
use std::str::FromStr;

use crate::error::LayoutError;
use crate::layout::{BlockLayout, UniformBlock};

/// Uniform block schema used by a rendering path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutSchema {
    /// Explicit `vec3` padding, `gbuffer_inv_size`, numbered UV sets.
    #[default]
    Common,
    /// Scalars packed behind `vec3`s, frustum size, depth mode, G-buffer offsets.
    Uniforms,
}

impl LayoutSchema {
    pub const ALL: [LayoutSchema; 2] = [LayoutSchema::Common, LayoutSchema::Uniforms];

    pub fn name(self) -> &'static str {
        match self {
            LayoutSchema::Common => "common",
            LayoutSchema::Uniforms => "uniforms",
        }
    }

    pub fn camera_layout(self) -> &'static BlockLayout {
        match self {
            LayoutSchema::Common => common::CameraData::LAYOUT,
            LayoutSchema::Uniforms => uniforms::CameraData::LAYOUT,
        }
    }

    pub fn object_layout(self) -> &'static BlockLayout {
        match self {
            LayoutSchema::Common => common::ObjectData::LAYOUT,
            LayoutSchema::Uniforms => uniforms::ObjectData::LAYOUT,
        }
    }

    /// Names of the `(u, v)` offset fields of UV set 0 in the object block.
    pub fn primary_uv_fields(self) -> (&'static str, &'static str) {
        let fields = self.object_layout().fields;
        (fields[1].name, fields[2].name)
    }
}

impl fmt::Display for LayoutSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutSchema {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutSchema::ALL
            .into_iter()
            .find(|schema| schema.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LayoutError::UnknownSchema(s.to_string()))
    }
}

/// Camera constants in one of the schemas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraBlock {
    Common(common::CameraData),
    Uniforms(uniforms::CameraData),
}

impl CameraBlock {
    pub fn schema(&self) -> LayoutSchema {
        match self {
            CameraBlock::Common(_) => LayoutSchema::Common,
            CameraBlock::Uniforms(_) => LayoutSchema::Uniforms,
        }
    }

    pub fn layout(&self) -> &'static BlockLayout {
        self.schema().camera_layout()
    }

    /// Raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CameraBlock::Common(data) => data.as_bytes(),
            CameraBlock::Uniforms(data) => data.as_bytes(),
        }
    }
}

impl From<common::CameraData> for CameraBlock {
    fn from(data: common::CameraData) -> Self {
        CameraBlock::Common(data)
    }
}

impl From<uniforms::CameraData> for CameraBlock {
    fn from(data: uniforms::CameraData) -> Self {
        CameraBlock::Uniforms(data)
    }
}

/// Object constants in one of the schemas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectBlock {
    Common(common::ObjectData),
    Uniforms(uniforms::ObjectData),
}

impl ObjectBlock {
    pub fn schema(&self) -> LayoutSchema {
        match self {
            ObjectBlock::Common(_) => LayoutSchema::Common,
            ObjectBlock::Uniforms(_) => LayoutSchema::Uniforms,
        }
    }

    pub fn layout(&self) -> &'static BlockLayout {
        self.schema().object_layout()
    }

    /// Raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ObjectBlock::Common(data) => data.as_bytes(),
            ObjectBlock::Uniforms(data) => data.as_bytes(),
        }
    }
}

impl From<common::ObjectData> for ObjectBlock {
    fn from(data: common::ObjectData) -> Self {
        ObjectBlock::Common(data)
    }
}

impl From<uniforms::ObjectData> for ObjectBlock {
    fn from(data: uniforms::ObjectData) -> Self {
        ObjectBlock::Uniforms(data)
    }
}

//! Layout error types.

use thiserror::Error;

use crate::layout::FieldType;

/// Errors raised while checking host and shader layouts against each other.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{block}: expected {expected} fields, found {actual}")]
    FieldCount {
        block: String,
        expected: usize,
        actual: usize,
    },
    #[error("{block}: field #{index} is named `{actual}`, expected `{expected}`")]
    FieldName {
        block: String,
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("{block}.{field}: expected type {expected}, found {actual}")]
    FieldType {
        block: String,
        field: String,
        expected: FieldType,
        actual: String,
    },
    #[error("{block}.{field}: expected offset {expected}, found {actual}")]
    FieldOffset {
        block: String,
        field: String,
        expected: u32,
        actual: u32,
    },
    #[error("{block}: expected size {expected} bytes, found {actual}")]
    BlockSize {
        block: String,
        expected: u32,
        actual: u32,
    },
    #[error("Block `{0}` not found in shader module")]
    MissingBlock(String),
    #[error("Failed to parse shader: {0}")]
    ShaderParse(String),
    #[error("Shader validation failed: {0}")]
    ShaderValidation(String),
    #[error("Failed to generate SPIR-V: {0}")]
    SpirvGeneration(String),
    #[error("Alignment must be a power of 2, got {0}")]
    InvalidAlignment(u64),
    #[error("Arena capacity cannot be zero")]
    ZeroCapacity,
    #[error("Unknown layout schema `{0}`")]
    UnknownSchema(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LayoutError::FieldOffset {
            block: "CameraData".into(),
            field: "camera_pos".into(),
            expected: 192,
            actual: 160,
        };
        assert_eq!(
            err.to_string(),
            "CameraData.camera_pos: expected offset 192, found 160"
        );

        let err = LayoutError::FieldType {
            block: "ObjectData".into(),
            field: "model".into(),
            expected: FieldType::Mat4,
            actual: "vec4".into(),
        };
        assert_eq!(
            err.to_string(),
            "ObjectData.model: expected type mat4, found vec4"
        );

        assert_eq!(
            LayoutError::InvalidAlignment(3).to_string(),
            "Alignment must be a power of 2, got 3"
        );
    }
}

//! Shader-side declarations and layout verification.
//!
//! WGSL and GLSL declarations are generated from the same [`BlockLayout`]
//! tables as the host structs. Hand-written or generated shader source can be
//! parsed with naga and reflected back into [`ReflectedBlock`]s, which are
//! then compared field by field against the host tables.

use std::fmt::Write as _;

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{BlockLayout, FieldType};
use crate::schema::LayoutSchema;
use crate::UniformConfig;

/// Instance name of the camera block in generated shaders.
pub const CAMERA_INSTANCE: &str = "camera";
/// Instance name of the object block in generated shaders.
pub const OBJECT_INSTANCE: &str = "draw";
/// Entry point of [`reference_wgsl_shader`].
pub const REFERENCE_WGSL_ENTRY: &str = "vs_main";

/// Descriptor set / bind group location of a uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BindingSlot {
    pub group: u32,
    pub binding: u32,
}

impl BindingSlot {
    pub const fn new(group: u32, binding: u32) -> Self {
        Self { group, binding }
    }
}

/// WGSL `struct` declaration for a block.
pub fn wgsl_struct(layout: &BlockLayout) -> String {
    let mut out = format!("struct {} {{\n", layout.name);
    for field in layout.fields {
        let _ = writeln!(out, "    {}: {},", field.name, field.ty.wgsl_name());
    }
    out.push_str("}\n");
    out
}

/// GLSL std140 uniform block declaration for a block.
pub fn glsl_block(layout: &BlockLayout, slot: BindingSlot, instance: &str) -> String {
    let mut out = format!(
        "layout(std140, set = {}, binding = {}) uniform {} {{\n",
        slot.group, slot.binding, layout.name
    );
    for field in layout.fields {
        let _ = writeln!(out, "    {} {};", field.ty.glsl_name(), field.name);
    }
    let _ = writeln!(out, "}} {instance};");
    out
}

/// Both blocks of the configured schema as WGSL, with their bindings.
pub fn wgsl_declarations(config: &UniformConfig) -> String {
    let camera = config.schema.camera_layout();
    let object = config.schema.object_layout();

    let mut out = String::new();
    out.push_str(&wgsl_struct(camera));
    out.push('\n');
    out.push_str(&wgsl_struct(object));
    out.push('\n');
    let _ = writeln!(
        out,
        "@group({}) @binding({}) var<uniform> {CAMERA_INSTANCE}: {};",
        config.camera_slot.group, config.camera_slot.binding, camera.name
    );
    let _ = writeln!(
        out,
        "@group({}) @binding({}) var<uniform> {OBJECT_INSTANCE}: {};",
        config.object_slot.group, config.object_slot.binding, object.name
    );
    out
}

/// Both blocks of the configured schema as GLSL uniform blocks.
pub fn glsl_declarations(config: &UniformConfig) -> String {
    let mut out = glsl_block(
        config.schema.camera_layout(),
        config.camera_slot,
        CAMERA_INSTANCE,
    );
    out.push('\n');
    out.push_str(&glsl_block(
        config.schema.object_layout(),
        config.object_slot,
        OBJECT_INSTANCE,
    ));
    out
}

const REFERENCE_WGSL_MAIN: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    var output: VertexOutput;
    output.clip_position = camera.view_proj * draw.model * vec4<f32>(position, 1.0);
    output.uv = vec2<f32>(
        dot(uv, draw.$U.xy) + draw.$U.w,
        dot(uv, draw.$V.xy) + draw.$V.w
    );
    return output;
}
"#;

const REFERENCE_GLSL_MAIN: &str = r#"
layout(location = 0) in vec3 in_position;
layout(location = 1) in vec2 in_uv;

layout(location = 0) out vec2 out_uv;

void main() {
    out_uv = vec2(
        dot(in_uv, draw.$U.xy) + draw.$U.w,
        dot(in_uv, draw.$V.xy) + draw.$V.w
    );
    gl_Position = camera.view_proj * draw.model * vec4(in_position, 1.0);
}
"#;

fn with_uv_fields(template: &str, schema: LayoutSchema) -> String {
    let (u, v) = schema.primary_uv_fields();
    template.replace("$U", u).replace("$V", v)
}

/// WGSL vertex shader consuming both blocks of the configured schema.
pub fn reference_wgsl_shader(config: &UniformConfig) -> String {
    let mut source = wgsl_declarations(config);
    source.push_str(&with_uv_fields(REFERENCE_WGSL_MAIN, config.schema));
    source
}

/// GLSL 450 vertex shader consuming both blocks of the configured schema.
pub fn reference_glsl_shader(config: &UniformConfig) -> String {
    let mut source = String::from("#version 450\n\n");
    source.push_str(&glsl_declarations(config));
    source.push_str(&with_uv_fields(REFERENCE_GLSL_MAIN, config.schema));
    source
}

pub fn parse_wgsl(source: &str) -> LayoutResult<naga::Module> {
    naga::front::wgsl::parse_str(source)
        .map_err(|e| LayoutError::ShaderParse(e.emit_to_string(source)))
}

pub fn parse_glsl(source: &str, stage: naga::ShaderStage) -> LayoutResult<naga::Module> {
    let mut frontend = naga::front::glsl::Frontend::default();
    frontend
        .parse(&naga::front::glsl::Options::from(stage), source)
        .map_err(|e| LayoutError::ShaderParse(format!("{e:?}")))
}

/// A struct member as laid out by the shader compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedMember {
    pub name: String,
    /// `None` when the member type is not one of the supported field types.
    pub ty: Option<FieldType>,
    pub type_name: String,
    pub offset: u32,
}

/// A struct as laid out by the shader compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedBlock {
    pub name: String,
    pub size: u32,
    pub members: Vec<ReflectedMember>,
}

fn field_type(inner: &naga::TypeInner) -> Option<FieldType> {
    use naga::{Scalar, TypeInner, VectorSize};

    match *inner {
        TypeInner::Scalar(scalar) if scalar == Scalar::F32 => Some(FieldType::Float),
        TypeInner::Vector { size, scalar } if scalar == Scalar::F32 => Some(match size {
            VectorSize::Bi => FieldType::Vec2,
            VectorSize::Tri => FieldType::Vec3,
            VectorSize::Quad => FieldType::Vec4,
        }),
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            scalar,
        } if scalar == Scalar::F32 => Some(FieldType::Mat4),
        _ => None,
    }
}

/// Find the struct type `name` in a parsed module.
pub fn reflect_block(module: &naga::Module, name: &str) -> LayoutResult<ReflectedBlock> {
    let (members, span) = module
        .types
        .iter()
        .find_map(|(_, ty)| match &ty.inner {
            naga::TypeInner::Struct { members, span } if ty.name.as_deref() == Some(name) => {
                Some((members, *span))
            }
            _ => None,
        })
        .ok_or_else(|| LayoutError::MissingBlock(name.to_string()))?;

    let members = members
        .iter()
        .map(|member| {
            let inner = &module.types[member.ty].inner;
            let ty = field_type(inner);
            ReflectedMember {
                name: member.name.clone().unwrap_or_default(),
                ty,
                type_name: ty.map_or_else(|| format!("{inner:?}"), |t| t.to_string()),
                offset: member.offset,
            }
        })
        .collect();

    Ok(ReflectedBlock {
        name: name.to_string(),
        size: span,
        members,
    })
}

/// Compare a host field table against a reflected shader struct.
pub fn verify_block(layout: &BlockLayout, reflected: &ReflectedBlock) -> LayoutResult<()> {
    let block = || layout.name.to_string();

    if layout.fields.len() != reflected.members.len() {
        return Err(LayoutError::FieldCount {
            block: block(),
            expected: layout.fields.len(),
            actual: reflected.members.len(),
        });
    }

    for (index, (field, member)) in layout.fields.iter().zip(&reflected.members).enumerate() {
        if field.name != member.name {
            return Err(LayoutError::FieldName {
                block: block(),
                index,
                expected: field.name.to_string(),
                actual: member.name.clone(),
            });
        }
        if member.ty != Some(field.ty) {
            return Err(LayoutError::FieldType {
                block: block(),
                field: field.name.to_string(),
                expected: field.ty,
                actual: member.type_name.clone(),
            });
        }
        if field.offset != member.offset {
            return Err(LayoutError::FieldOffset {
                block: block(),
                field: field.name.to_string(),
                expected: field.offset,
                actual: member.offset,
            });
        }
    }

    if layout.size != reflected.size {
        return Err(LayoutError::BlockSize {
            block: block(),
            expected: layout.size,
            actual: reflected.size,
        });
    }
    Ok(())
}

fn verify_module(schema: LayoutSchema, module: &naga::Module) -> LayoutResult<()> {
    for layout in [schema.camera_layout(), schema.object_layout()] {
        let reflected = reflect_block(module, layout.name)?;
        verify_block(layout, &reflected)?;
        log::debug!(
            "{} ({schema}) matches shader: {} fields, {} bytes",
            layout.name,
            layout.fields.len(),
            layout.size
        );
    }
    Ok(())
}

/// Check that a WGSL source declares both blocks of `schema` exactly as the host does.
pub fn verify_wgsl(schema: LayoutSchema, source: &str) -> LayoutResult<()> {
    verify_module(schema, &parse_wgsl(source)?)
}

/// Check that a GLSL shader of the given stage declares both blocks of
/// `schema` exactly as the host does.
pub fn verify_glsl(
    schema: LayoutSchema,
    source: &str,
    stage: naga::ShaderStage,
) -> LayoutResult<()> {
    verify_module(schema, &parse_glsl(source, stage)?)
}

/// Validate a WGSL module and compile `entry_point` to SPIR-V.
pub fn compile_spirv(source: &str, entry_point: &str) -> LayoutResult<Vec<u32>> {
    let module = parse_wgsl(source)?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    let info = validator
        .validate(&module)
        .map_err(|e| LayoutError::ShaderValidation(e.to_string()))?;

    let stage = module
        .entry_points
        .iter()
        .find(|ep| ep.name == entry_point)
        .map(|ep| ep.stage)
        .ok_or_else(|| {
            LayoutError::ShaderValidation(format!("Entry point '{entry_point}' not found"))
        })?;

    let options = naga::back::spv::Options {
        lang_version: (1, 3),
        ..Default::default()
    };
    let pipeline_options = naga::back::spv::PipelineOptions {
        shader_stage: stage,
        entry_point: entry_point.to_string(),
    };

    let spv = naga::back::spv::write_vec(&module, &info, &options, Some(&pipeline_options))
        .map_err(|e| LayoutError::SpirvGeneration(e.to_string()))?;

    log::debug!("Compiled '{entry_point}' to {} SPIR-V words", spv.len());
    Ok(spv)
}

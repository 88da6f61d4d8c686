//! Host/shader layout equivalence tests.
//!
//! For every schema, the host structs, the generated WGSL and GLSL
//! declarations, and the reference shaders must agree on every field offset
//! and on the block sizes.

use glam::{Mat4, Vec2, Vec3, Vec4};
use rstest::rstest;

use uniform_layouts::shader::{self, BindingSlot};
use uniform_layouts::{
    schema, Camera, DrawObject, FrameParams, LayoutSchema, UniformArena, UniformBlock,
    UniformConfig, UvTransform,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn wgsl_module(schema: LayoutSchema) -> naga::Module {
    shader::parse_wgsl(&shader::wgsl_declarations(&UniformConfig::with_schema(schema))).unwrap()
}

fn glsl_module(schema: LayoutSchema) -> naga::Module {
    let source = shader::reference_glsl_shader(&UniformConfig::with_schema(schema));
    shader::parse_glsl(&source, naga::ShaderStage::Vertex).unwrap()
}

#[rstest]
#[case::common(LayoutSchema::Common)]
#[case::uniforms(LayoutSchema::Uniforms)]
fn test_wgsl_offsets_match_host(#[case] schema: LayoutSchema) {
    init_logging();
    let module = wgsl_module(schema);

    for layout in [schema.camera_layout(), schema.object_layout()] {
        let reflected = shader::reflect_block(&module, layout.name).unwrap();
        assert_eq!(reflected.size, layout.size, "{}", layout.name);
        for (field, member) in layout.fields.iter().zip(&reflected.members) {
            assert_eq!(field.name, member.name);
            assert_eq!(field.offset, member.offset, "{}.{}", layout.name, field.name);
        }
    }
}

#[rstest]
#[case::common(LayoutSchema::Common)]
#[case::uniforms(LayoutSchema::Uniforms)]
fn test_glsl_offsets_match_host(#[case] schema: LayoutSchema) {
    init_logging();
    let module = glsl_module(schema);

    for layout in [schema.camera_layout(), schema.object_layout()] {
        let reflected = shader::reflect_block(&module, layout.name).unwrap();
        shader::verify_block(layout, &reflected).unwrap();
    }
}

#[rstest]
#[case::common(LayoutSchema::Common, 224)]
#[case::uniforms(LayoutSchema::Uniforms, 256)]
fn test_camera_block_size(#[case] schema: LayoutSchema, #[case] size: u32) {
    assert_eq!(schema.camera_layout().size, size);
    let camera = Camera::default().camera_block(schema, &FrameParams::new(1280, 720));
    assert_eq!(camera.as_bytes().len(), size as usize);
}

#[test]
fn test_host_structs_report_their_tables() {
    assert_eq!(
        schema::common::CameraData::LAYOUT.size as usize,
        std::mem::size_of::<schema::common::CameraData>()
    );
    assert_eq!(
        schema::uniforms::CameraData::LAYOUT.size as usize,
        std::mem::size_of::<schema::uniforms::CameraData>()
    );
    assert_eq!(schema::common::ObjectData::LAYOUT.fields[0].offset, 0);
    assert_eq!(schema::uniforms::ObjectData::LAYOUT.fields[0].offset, 0);
}

#[test]
fn test_common_camera_pos_follows_matrices() {
    let module = wgsl_module(LayoutSchema::Common);
    let camera = shader::reflect_block(&module, "CameraData").unwrap();
    let offset = |name: &str| {
        camera
            .members
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.offset)
            .unwrap()
    };

    assert_eq!(offset("camera_pos"), 64 * 3);
    assert_eq!(offset("_pad0"), 64 * 3 + 12);
    assert_eq!(offset("gbuffer_inv_size"), 64 * 3 + 16);
}

#[test]
fn test_custom_binding_slots() {
    init_logging();
    let config = UniformConfig {
        schema: LayoutSchema::Uniforms,
        camera_slot: BindingSlot::new(0, 0),
        object_slot: BindingSlot::new(1, 0),
        ..Default::default()
    };

    let wgsl = shader::reference_wgsl_shader(&config);
    assert!(wgsl.contains("@group(1) @binding(0) var<uniform> draw: ObjectData;"));
    shader::verify_wgsl(config.schema, &wgsl).unwrap();
    let spv = shader::compile_spirv(&wgsl, shader::REFERENCE_WGSL_ENTRY).unwrap();
    assert!(!spv.is_empty());

    let glsl = shader::reference_glsl_shader(&config);
    assert!(glsl.contains("layout(std140, set = 1, binding = 0) uniform ObjectData {"));
    shader::verify_glsl(config.schema, &glsl, naga::ShaderStage::Vertex).unwrap();
}

#[test]
fn test_hand_written_shader_with_wrong_packing_is_rejected() {
    // `far_clip` and `frustum_size` swapped: frustum_size moves to a new 16-byte row.
    let source = r#"
struct CameraData {
    view: mat4x4<f32>,
    view_inv: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    camera_pos: vec3<f32>,
    near_clip: f32,
    far_clip: f32,
    frustum_size: vec3<f32>,
    depth_mode: vec4<f32>,
    gbuffer_offsets: vec4<f32>,
}

struct ObjectData {
    model: mat4x4<f32>,
    u_offset: vec4<f32>,
    v_offset: vec4<f32>,
    u_offset1: vec4<f32>,
    v_offset1: vec4<f32>,
}
"#;
    let err = shader::verify_wgsl(LayoutSchema::Uniforms, source).unwrap_err();
    assert_eq!(
        err.to_string(),
        "CameraData: field #5 is named `far_clip`, expected `frustum_size`"
    );
}

#[test]
fn test_frame_upload() {
    init_logging();
    let config = UniformConfig::with_schema(LayoutSchema::Common);
    let mut arena = UniformArena::from_config(&config).unwrap();

    let atlas = UvTransform::from_atlas_rect(Vec2::new(0.5, 0.0), Vec2::splat(0.5));
    let offsets: Vec<u64> = (0..100)
        .map(|i| {
            let model = Mat4::from_translation(Vec3::new(
                15.0 * (i / 10) as f32,
                0.0,
                15.0 * (i % 10) as f32,
            ));
            let block = DrawObject::new(model)
                .with_uv_set(0, atlas)
                .object_block(config.schema);
            arena.push_object(&block).unwrap().offset
        })
        .collect();

    assert_eq!(arena.len(), 100);
    assert!(offsets
        .iter()
        .all(|offset| offset % config.min_uniform_offset_alignment == 0));

    // Draw 37 sits at (45, 0, 105); its model translation column starts at byte 48.
    let start = offsets[37] as usize;
    let block = &arena.as_bytes()[start..start + 128];
    let translation: [f32; 4] = bytemuck::pod_read_unaligned(&block[48..64]);
    assert_eq!(translation, [45.0, 0.0, 105.0, 1.0]);

    let u_offset: [f32; 4] = bytemuck::pod_read_unaligned(&block[64..80]);
    assert_eq!(Vec4::from_array(u_offset), atlas.u_offset);
}

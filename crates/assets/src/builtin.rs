//! Built-in WGSL programs and config-driven shader source resolution.
//!
//! Every program is a vertex stage with entry point `vs_main` and a fragment
//! stage with entry point `fs_main`. Stage sources loaded from disk must
//! follow the same convention and declare the same `Uniforms` block.

use crate::{AssetError, ShaderSource};
use cubeview_common::{ShaderPaths, ViewerConfig};

/// Uniform block at group 0, mirrored by the wgpu backend's `Uniforms`.
const UNIFORMS: &str = r#"
struct Uniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    object_colour: vec4<f32>,
    light_colour: vec4<f32>,
    light_pos: vec4<f32>,
    view_pos: vec4<f32>,
    units: vec4<i32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};
"#;

/// Texture units 0 and 1 plus a shared sampler at group 1.
const TEXTURES: &str = r#"
@group(1) @binding(0)
var texture0: texture_2d<f32>;
@group(1) @binding(1)
var texture1: texture_2d<f32>;
@group(1) @binding(2)
var tex_sampler: sampler;

fn sample_unit(unit: i32, uv: vec2<f32>) -> vec4<f32> {
    let a = textureSample(texture0, tex_sampler, uv);
    let b = textureSample(texture1, tex_sampler, uv);
    return select(a, b, unit == 1);
}
"#;

const MESH_VERTEX: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = u.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = u.projection * u.view * world;
    out.world_pos = world.xyz;
    out.normal = (u.model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv;
    return out;
}
"#;

const CUBE_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let diffuse_map = sample_unit(u.units.x, in.uv).rgb;
    let specular_map = sample_unit(u.units.y, in.uv).rgb;
    let light = u.light_colour.rgb;

    let n = normalize(in.normal);
    let light_dir = normalize(u.light_pos.xyz - in.world_pos);
    let view_dir = normalize(u.view_pos.xyz - in.world_pos);
    let reflect_dir = reflect(-light_dir, n);

    let ambient = 0.1 * light * diffuse_map;
    let diffuse = max(dot(n, light_dir), 0.0) * light * diffuse_map;
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), u.params.x);
    let specular = spec * light * specular_map;
    return vec4<f32>(ambient + diffuse + specular, 1.0);
}
"#;

const MODEL_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = sample_unit(0, in.uv).rgb;
    let light = u.light_colour.rgb;

    let n = normalize(in.normal);
    let light_dir = normalize(u.light_pos.xyz - in.world_pos);
    let view_dir = normalize(u.view_pos.xyz - in.world_pos);
    let reflect_dir = reflect(-light_dir, n);

    let ambient = 0.2 * light;
    let diffuse = max(dot(n, light_dir), 0.0) * light;
    let specular = 0.5 * pow(max(dot(view_dir, reflect_dir), 0.0), 32.0) * light;
    return vec4<f32>((ambient + diffuse + specular) * albedo, 1.0);
}
"#;

/// Phong shading with diffuse and specular maps on texture units.
pub fn builtin_cube_shader() -> ShaderSource {
    ShaderSource::new(
        "cube",
        format!("{UNIFORMS}{MESH_VERTEX}"),
        format!("{UNIFORMS}{TEXTURES}{CUBE_FRAGMENT}"),
    )
}

/// Phong shading with the model's own diffuse texture.
pub fn builtin_model_shader() -> ShaderSource {
    ShaderSource::new(
        "model",
        format!("{UNIFORMS}{MESH_VERTEX}"),
        format!("{UNIFORMS}{TEXTURES}{MODEL_FRAGMENT}"),
    )
}

fn resolve(
    paths: Option<&ShaderPaths>,
    builtin: fn() -> ShaderSource,
) -> Result<ShaderSource, AssetError> {
    match paths {
        Some(paths) => ShaderSource::from_files(&paths.vertex, &paths.fragment),
        None => Ok(builtin()),
    }
}

/// Cube and model program sources: file overrides from `config`, else built-ins.
pub fn program_sources(config: &ViewerConfig) -> Result<(ShaderSource, ShaderSource), AssetError> {
    let cube = resolve(config.cube_shader.as_ref(), builtin_cube_shader)?;
    let model = resolve(config.model_shader.as_ref(), builtin_model_shader)?;
    Ok((cube, model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_builtins() {
        let (cube, model) = program_sources(&ViewerConfig::default()).unwrap();
        assert_eq!(cube, builtin_cube_shader());
        assert_eq!(model.label, "model");
    }

    #[test]
    fn missing_override_is_an_error() {
        let config = ViewerConfig {
            model_shader: Some(ShaderPaths {
                vertex: "/nonexistent/model.vert.wgsl".into(),
                fragment: "/nonexistent/model.frag.wgsl".into(),
            }),
            ..ViewerConfig::default()
        };
        assert!(matches!(
            program_sources(&config),
            Err(AssetError::Io { .. })
        ));
    }

    #[test]
    fn builtin_stages_have_entry_points() {
        for src in [builtin_cube_shader(), builtin_model_shader()] {
            assert!(src.vertex.contains("fn vs_main"));
            assert!(src.fragment.contains("fn fs_main"));
            assert!(src.fragment.contains("struct Uniforms"));
        }
    }
}

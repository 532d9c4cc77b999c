use bytemuck::{Pod, Zeroable};
use cubeview_common::UniformValue;
use glam::{Mat4, Vec3};

/// CPU mirror of the WGSL `Uniforms` block shared by every program.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Uniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub object_colour: [f32; 4],
    pub light_colour: [f32; 4],
    pub light_pos: [f32; 4],
    pub view_pos: [f32; 4],
    /// x: unit sampled as the diffuse map, y: unit sampled as the specular map.
    pub units: [i32; 4],
    /// x: specular shininess exponent.
    pub params: [f32; 4],
}

impl Default for Uniforms {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            model: identity,
            view: identity,
            projection: identity,
            object_colour: [1.0; 4],
            light_colour: [1.0; 4],
            light_pos: [0.0, 0.0, 0.0, 1.0],
            view_pos: [0.0, 0.0, 0.0, 1.0],
            units: [0, 1, 0, 0],
            params: [32.0, 0.0, 0.0, 0.0],
        }
    }
}

fn point(v: Vec3) -> [f32; 4] {
    v.extend(1.0).to_array()
}

impl Uniforms {
    /// Write a uniform by its program-level name. Returns `false` when the
    /// name is unknown or the value has the wrong type for it.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        match (name, value) {
            ("model", UniformValue::Mat4(m)) => self.model = m.to_cols_array_2d(),
            ("view", UniformValue::Mat4(m)) => self.view = m.to_cols_array_2d(),
            ("projection", UniformValue::Mat4(m)) => self.projection = m.to_cols_array_2d(),
            ("objectColour", UniformValue::Vec3(v)) => self.object_colour = point(v),
            ("lightColour", UniformValue::Vec3(v)) => self.light_colour = point(v),
            ("lightPos", UniformValue::Vec3(v)) => self.light_pos = point(v),
            ("viewPos", UniformValue::Vec3(v)) => self.view_pos = point(v),
            ("diffuseMap", UniformValue::Int(unit)) => self.units[0] = unit,
            ("specularMap", UniformValue::Int(unit)) => self.units[1] = unit,
            ("shininess", UniformValue::Float(s)) => self.params[0] = s,
            _ => return false,
        }
        true
    }
}

/// Distance between consecutive snapshots in the dynamic uniform buffer.
pub(crate) fn slot_stride(min_alignment: u32) -> u64 {
    let size = std::mem::size_of::<Uniforms>() as u64;
    let align = u64::from(min_alignment.max(1));
    size.div_ceil(align) * align
}

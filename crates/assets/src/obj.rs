use crate::AssetError;
use std::path::{Path, PathBuf};

/// Interleaved vertex as imported from a model file.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// One drawable piece of a model with its material inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub diffuse_colour: [f32; 3],
    /// Resolved against the model file's directory.
    pub diffuse_texture: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len()).sum()
    }
}

/// Load a Wavefront OBJ file and its MTL materials.
///
/// A missing or broken MTL is logged and replaced by a plain white material.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ModelData, AssetError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|e| {
        tracing::warn!("no usable MTL for {}: {e}", path.display());
        Vec::new()
    });
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let meshes = models
        .into_iter()
        .map(|model| {
            let material = model.mesh.material_id.and_then(|id| materials.get(id));
            let diffuse_colour = material.and_then(|m| m.diffuse).unwrap_or([1.0, 1.0, 1.0]);
            let diffuse_texture = material
                .and_then(|m| m.diffuse_texture.as_deref())
                .filter(|t| !t.is_empty())
                .map(|t| base_dir.join(t));
            MeshData {
                name: model.name,
                vertices: interleave(&model.mesh),
                indices: model.mesh.indices,
                diffuse_colour,
                diffuse_texture,
            }
        })
        .collect::<Vec<_>>();

    let data = ModelData { meshes };
    tracing::info!(
        "loaded {} ({} meshes, {} vertices)",
        path.display(),
        data.meshes.len(),
        data.vertex_count()
    );
    Ok(data)
}

fn interleave(mesh: &tobj::Mesh) -> Vec<ModelVertex> {
    let count = mesh.positions.len() / 3;
    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals.clone()
    } else {
        smooth_normals(&mesh.positions, &mesh.indices)
    };
    let has_uv = mesh.texcoords.len() / 2 == count;

    (0..count)
        .map(|i| ModelVertex {
            position: [
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            ],
            normal: [normals[3 * i], normals[3 * i + 1], normals[3 * i + 2]],
            // OBJ puts v=0 at the bottom; textures are sampled top-down.
            uv: if has_uv {
                [mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1]]
            } else {
                [0.0, 0.0]
            },
        })
        .collect()
}

/// Area-weighted vertex normals for meshes that ship without them.
fn smooth_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex = |i: u32| {
        let i = i as usize * 3;
        [positions[i], positions[i + 1], positions[i + 2]]
    };
    let mut normals = vec![0.0_f32; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2]));
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        for &idx in tri {
            let o = idx as usize * 3;
            normals[o] += n[0];
            normals[o + 1] += n[1];
            normals[o + 2] += n[2];
        }
    }
    for n in normals.chunks_exact_mut(3) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > f32::EPSILON {
            n.iter_mut().for_each(|c| *c /= len);
        } else {
            n.copy_from_slice(&[0.0, 1.0, 0.0]);
        }
    }
    normals
}

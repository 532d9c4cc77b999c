use crate::AssetError;
use std::path::Path;

/// Vertex-stage and fragment-stage shader source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(
        label: impl Into<String>,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Read both stages from disk. The label is taken from the vertex file stem.
    pub fn from_files(
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<Self, AssetError> {
        let vertex = vertex.as_ref();
        let fragment = fragment.as_ref();
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| AssetError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let label = vertex
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "shader".into());
        Ok(Self {
            label,
            vertex: read(vertex)?,
            fragment: read(fragment)?,
        })
    }
}

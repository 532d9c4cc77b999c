use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Index of a compiled shader program in the backend's shader table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShaderId(pub u32);

/// Index of a loaded model in the backend's model table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId(pub u32);

/// Opaque handle to an uploaded 2D texture.
///
/// Handle `0` is reserved as the invalid sentinel returned when a texture
/// fails to decode. Valid handles start at `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const INVALID: Self = Self(0);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for TextureHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Discrete camera movement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// A value that can be written to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_texture_handle_is_invalid() {
        assert!(!TextureHandle::INVALID.is_valid());
        assert!(!TextureHandle::default().is_valid());
        assert!(TextureHandle(1).is_valid());
    }

    #[test]
    fn uniform_value_conversions() {
        assert_eq!(UniformValue::from(3), UniformValue::Int(3));
        assert_eq!(UniformValue::from(0.5_f32), UniformValue::Float(0.5));
        assert_eq!(UniformValue::from(Vec3::X), UniformValue::Vec3(Vec3::X));
        assert_eq!(
            UniformValue::from(Mat4::IDENTITY),
            UniformValue::Mat4(Mat4::IDENTITY)
        );
    }
}

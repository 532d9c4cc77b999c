use cubeview_common::{ShaderId, TextureHandle};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Half-extent of the integer grid cubes are spawned on, per axis.
pub const SPAWN_EXTENT: i32 = 10;

/// A user-spawned renderable cube.
///
/// Everything here is fixed at spawn. The spin applied at draw time is
/// derived from frame time and is not part of the instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub position: Vec3,
    pub shader: ShaderId,
    pub diffuse: TextureHandle,
    pub specular: TextureHandle,
}

/// Source of spawn positions.
///
/// Seeded construction gives reproducible layouts for tests and scripted runs.
pub struct SpawnRng(StdRng);

impl SpawnRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Integer-valued position with every component in `[-SPAWN_EXTENT, SPAWN_EXTENT]`.
    pub fn next_position(&mut self) -> Vec3 {
        let mut axis = || self.0.random_range(-SPAWN_EXTENT..=SPAWN_EXTENT) as f32;
        let x = axis();
        let y = axis();
        let z = axis();
        Vec3::new(x, y, z)
    }
}

impl std::fmt::Debug for SpawnRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SpawnRng")
    }
}

/// Insertion-ordered, append-only collection of spawned cubes.
#[derive(Debug, Clone, Default)]
pub struct CubeRegistry {
    cubes: Vec<Cube>,
}

impl CubeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cube. Returns its index in spawn order.
    pub fn spawn(
        &mut self,
        position: Vec3,
        shader: ShaderId,
        diffuse: TextureHandle,
        specular: TextureHandle,
    ) -> usize {
        self.cubes.push(Cube {
            position,
            shader,
            diffuse,
            specular,
        });
        let index = self.cubes.len() - 1;
        tracing::debug!(
            "spawned cube {index} at ({}, {}, {})",
            position.x,
            position.y,
            position.z
        );
        index
    }

    /// Append a cube at a random grid position drawn from `rng`.
    pub fn spawn_random(
        &mut self,
        rng: &mut SpawnRng,
        shader: ShaderId,
        diffuse: TextureHandle,
        specular: TextureHandle,
    ) -> usize {
        let position = rng.next_position();
        self.spawn(position, shader, diffuse, specular)
    }

    /// Iterate cubes in spawn order. Restartable every frame.
    pub fn iter(&self) -> std::slice::Iter<'_, Cube> {
        self.cubes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Cube> {
        self.cubes.get(index)
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }
}

impl<'a> IntoIterator for &'a CubeRegistry {
    type Item = &'a Cube;
    type IntoIter = std::slice::Iter<'a, Cube>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHADER: ShaderId = ShaderId(0);
    const DIFFUSE: TextureHandle = TextureHandle(1);
    const SPECULAR: TextureHandle = TextureHandle(2);

    #[test]
    fn spawn_preserves_insertion_order() {
        let mut reg = CubeRegistry::new();
        for i in 0..5 {
            let idx = reg.spawn(Vec3::splat(i as f32), SHADER, DIFFUSE, SPECULAR);
            assert_eq!(idx, i);
        }
        let xs: Vec<f32> = reg.iter().map(|c| c.position.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn iteration_is_restartable() {
        let mut reg = CubeRegistry::new();
        reg.spawn(Vec3::ONE, SHADER, DIFFUSE, SPECULAR);
        reg.spawn(Vec3::NEG_ONE, SHADER, DIFFUSE, SPECULAR);
        let first: Vec<Cube> = reg.iter().copied().collect();
        let second: Vec<Cube> = (&reg).into_iter().copied().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_positions_are_allowed() {
        let mut reg = CubeRegistry::new();
        reg.spawn(Vec3::ZERO, SHADER, DIFFUSE, SPECULAR);
        reg.spawn(Vec3::ZERO, SHADER, DIFFUSE, SPECULAR);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn bindings_are_kept() {
        let mut reg = CubeRegistry::new();
        reg.spawn(Vec3::ZERO, ShaderId(3), TextureHandle::INVALID, SPECULAR);
        let cube = reg.get(0).unwrap();
        assert_eq!(cube.shader, ShaderId(3));
        assert_eq!(cube.diffuse, TextureHandle::INVALID);
        assert_eq!(cube.specular, SPECULAR);
    }

    #[test]
    fn random_positions_are_integer_grid_points() {
        let mut rng = SpawnRng::seeded(1234);
        let mut reg = CubeRegistry::new();
        for _ in 0..500 {
            reg.spawn_random(&mut rng, SHADER, DIFFUSE, SPECULAR);
        }
        let limit = SPAWN_EXTENT as f32;
        for cube in &reg {
            for c in cube.position.to_array() {
                assert!((-limit..=limit).contains(&c));
                assert_eq!(c.fract(), 0.0);
            }
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = SpawnRng::seeded(42);
        let mut b = SpawnRng::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.next_position(), b.next_position());
        }
    }

    #[test]
    fn empty_registry() {
        let reg = CubeRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.iter().count(), 0);
        assert!(reg.get(0).is_none());
    }
}

use crate::camera::Camera;
use crate::gfx::{Graphics, RenderError, ResourceLoader};
use cubeview_assets::ShaderSource;
use cubeview_common::{ModelId, ShaderId, TextureHandle, ViewerConfig};
use cubeview_input::{Action, InputMapper};
use cubeview_kernel::{AnimationClock, CubeRegistry, FrameTiming, SpawnRng};
use glam::{Mat4, Vec3};

pub const CLEAR_COLOUR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];
pub const OBJECT_COLOUR: Vec3 = Vec3::new(1.0, 0.5, 0.31);
pub const LIGHT_COLOUR: Vec3 = Vec3::ONE;
pub const LIGHT_POSITION: Vec3 = Vec3::new(5.0, 0.0, 5.0);
pub const CUBE_SHININESS: f32 = 32.0;

/// Texture unit the cube diffuse map is bound to.
pub const DIFFUSE_UNIT: u32 = 0;
/// Texture unit the cube specular map is bound to.
pub const SPECULAR_UNIT: u32 = 1;

/// GPU resources acquired once at startup and shared by every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneAssets {
    pub cube_shader: ShaderId,
    pub model_shader: ShaderId,
    pub diffuse: TextureHandle,
    pub specular: TextureHandle,
    pub animated_model: ModelId,
    pub static_model: ModelId,
}

impl SceneAssets {
    /// Create shaders and load textures and models named by `config`.
    ///
    /// Only shader creation can fail; texture and model failures are logged
    /// by the loader and leave an invalid or empty resource behind.
    pub fn load<L: ResourceLoader>(
        loader: &mut L,
        config: &ViewerConfig,
        cube_source: &ShaderSource,
        model_source: &ShaderSource,
    ) -> Result<Self, RenderError> {
        let cube_shader = loader.create_shader(cube_source)?;
        let model_shader = loader.create_shader(model_source)?;
        let animated_model = loader.load_model(&config.animated_model);
        let static_model = loader.load_model(&config.static_model);
        let diffuse = loader.load_texture(&config.diffuse_texture);
        let specular = loader.load_texture(&config.specular_texture);
        Ok(Self {
            cube_shader,
            model_shader,
            diffuse,
            specular,
            animated_model,
            static_model,
        })
    }
}

/// View and projection for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

/// Cube model transform: translate to its spawn point, then spin about Y by
/// `time` radians. All cubes share the same spin.
pub fn cube_model_matrix(position: Vec3, time: f32) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_rotation_y(time)
}

/// Transform for the animated model; `offset` slides it along its local Z.
pub fn animated_model_matrix(offset: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(0.03))
        * Mat4::from_rotation_x(270.0_f32.to_radians())
        * Mat4::from_translation(Vec3::new(0.0, 0.0, offset))
}

pub fn static_model_matrix() -> Mat4 {
    Mat4::from_scale(Vec3::splat(0.2)) * Mat4::from_translation(Vec3::new(0.0, -12.0, 0.0))
}

/// All per-run viewer state, owned by the run loop.
#[derive(Debug)]
pub struct Viewer {
    camera: Camera,
    registry: CubeRegistry,
    timing: FrameTiming,
    animation: AnimationClock,
    input: InputMapper,
    rng: SpawnRng,
    assets: SceneAssets,
    viewport: (u32, u32),
    should_close: bool,
}

impl Viewer {
    pub fn new(assets: SceneAssets, viewport: (u32, u32), rng: SpawnRng) -> Self {
        Self {
            camera: Camera::default(),
            registry: CubeRegistry::new(),
            timing: FrameTiming::new(),
            animation: AnimationClock::new(),
            input: InputMapper::new(),
            rng,
            assets,
            viewport,
            should_close: false,
        }
    }

    /// Platform events are fed here between frames.
    pub fn input_mut(&mut self) -> &mut InputMapper {
        &mut self.input
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn registry(&self) -> &CubeRegistry {
        &self.registry
    }

    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    pub fn animation(&self) -> &AnimationClock {
        &self.animation
    }

    pub fn assets(&self) -> &SceneAssets {
        &self.assets
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn request_close(&mut self) {
        self.should_close = true;
    }

    /// Track a new framebuffer size. Zero dimensions are kept at one.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        tracing::debug!("viewport resized to {}x{}", self.viewport.0, self.viewport.1);
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1.max(1) as f32
    }

    pub fn frame_matrices(&self) -> FrameMatrices {
        FrameMatrices {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(self.aspect()),
        }
    }

    /// Run one frame. `now` is seconds since start on a monotonic clock.
    pub fn frame<G: Graphics>(&mut self, now: f32, gfx: &mut G) {
        let dt = self.timing.tick(now);

        for action in self.input.drain() {
            self.apply(action, dt);
        }

        gfx.clear(CLEAR_COLOUR);
        let FrameMatrices { view, projection } = self.frame_matrices();

        self.draw_cubes(gfx, view, projection, now);
        self.draw_models(gfx, view, projection);

        self.animation.advance(dt);
        gfx.swap_buffers();
    }

    fn apply(&mut self, action: Action, dt: f32) {
        match action {
            Action::Move(direction) => self.camera.process_move(direction, dt),
            Action::Look { dx, dy } => self.camera.process_mouse_delta(dx, dy),
            Action::Zoom(dy) => self.camera.process_scroll(dy),
            Action::SpawnCube => {
                let index = self.registry.spawn_random(
                    &mut self.rng,
                    self.assets.cube_shader,
                    self.assets.diffuse,
                    self.assets.specular,
                );
                tracing::info!("cube count: {}", index + 1);
            }
            Action::Exit => self.request_close(),
        }
    }

    fn draw_cubes<G: Graphics>(&self, gfx: &mut G, view: Mat4, projection: Mat4, time: f32) {
        for cube in &self.registry {
            gfx.program(cube.shader)
                .set_vec3("objectColour", OBJECT_COLOUR)
                .set_vec3("lightColour", LIGHT_COLOUR)
                .set_vec3("lightPos", LIGHT_POSITION)
                .set_vec3("viewPos", self.camera.position)
                .set_float("shininess", CUBE_SHININESS)
                .set_mat4("model", cube_model_matrix(cube.position, time))
                .set_mat4("view", view)
                .set_mat4("projection", projection)
                .bind_texture(DIFFUSE_UNIT, cube.diffuse)
                .set_int("diffuseMap", DIFFUSE_UNIT as i32)
                .bind_texture(SPECULAR_UNIT, cube.specular)
                .set_int("specularMap", SPECULAR_UNIT as i32)
                .draw_cube();
        }
    }

    fn draw_models<G: Graphics>(&self, gfx: &mut G, view: Mat4, projection: Mat4) {
        let mut program = gfx.program(self.assets.model_shader);
        program
            .set_vec3("objectColour", OBJECT_COLOUR)
            .set_vec3("lightColour", LIGHT_COLOUR)
            .set_vec3("lightPos", LIGHT_POSITION)
            .set_vec3("viewPos", self.camera.position)
            .set_mat4("view", view)
            .set_mat4("projection", projection);

        program.set_mat4("model", animated_model_matrix(self.animation.value()));
        program.draw_model(self.assets.animated_model);

        program.set_mat4("model", static_model_matrix());
        program.draw_model(self.assets.static_model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{GfxCommand, RecordingGraphics};
    use cubeview_common::{MoveDirection, UniformValue};
    use cubeview_input::Key;
    use cubeview_kernel::{ANIMATION_WRAP, SPAWN_EXTENT};

    fn setup() -> (Viewer, RecordingGraphics) {
        let mut gfx = RecordingGraphics::new();
        let src = ShaderSource::new("test", "// vs", "// fs");
        let config = ViewerConfig {
            diffuse_texture: "/nonexistent/diffuse.png".into(),
            specular_texture: "/nonexistent/specular.png".into(),
            animated_model: "/nonexistent/a.obj".into(),
            static_model: "/nonexistent/b.obj".into(),
            ..ViewerConfig::default()
        };
        let assets = SceneAssets::load(&mut gfx, &config, &src, &src).unwrap();
        gfx.take_commands();
        (Viewer::new(assets, (800, 600), SpawnRng::seeded(7)), gfx)
    }

    fn tap_space(viewer: &mut Viewer) {
        viewer.input_mut().key_event(Key::Space, true);
        viewer.input_mut().key_event(Key::Space, false);
    }

    fn cube_draws(cmds: &[GfxCommand]) -> usize {
        cmds.iter()
            .filter(|c| matches!(c, GfxCommand::DrawCube { .. }))
            .count()
    }

    fn uniform<'a>(cmds: &'a [GfxCommand], wanted: &str) -> Vec<&'a UniformValue> {
        cmds.iter()
            .filter_map(|c| match c {
                GfxCommand::SetUniform { name, value, .. } if name == wanted => Some(value),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn missing_assets_give_invalid_handles() {
        let (viewer, gfx) = setup();
        let assets = viewer.assets();
        assert!(!assets.diffuse.is_valid());
        assert!(!assets.specular.is_valid());
        assert_ne!(assets.cube_shader, assets.model_shader);
        assert_eq!(gfx.model(assets.animated_model).unwrap().meshes, 0);
    }

    #[test]
    fn empty_scene_frame_protocol() {
        let (mut viewer, mut gfx) = setup();
        viewer.frame(0.016, &mut gfx);
        let cmds = gfx.take_commands();
        assert_eq!(cmds.first(), Some(&GfxCommand::Clear(CLEAR_COLOUR)));
        assert_eq!(cmds.last(), Some(&GfxCommand::SwapBuffers));
        assert_eq!(cube_draws(&cmds), 0);
        let models: Vec<ModelId> = cmds
            .iter()
            .filter_map(|c| match c {
                GfxCommand::DrawModel { model, shader } => {
                    assert_eq!(*shader, Some(viewer.assets().model_shader));
                    Some(*model)
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            models,
            vec![viewer.assets().animated_model, viewer.assets().static_model]
        );
    }

    #[test]
    fn cubes_draw_before_models_in_spawn_order() {
        let (mut viewer, mut gfx) = setup();
        for _ in 0..3 {
            tap_space(&mut viewer);
        }
        viewer.frame(0.5, &mut gfx);
        let cmds = gfx.take_commands();
        assert_eq!(viewer.registry().len(), 3);

        let first_model = cmds
            .iter()
            .position(|c| matches!(c, GfxCommand::DrawModel { .. }))
            .unwrap();
        let last_cube = cmds
            .iter()
            .rposition(|c| matches!(c, GfxCommand::DrawCube { .. }))
            .unwrap();
        assert!(last_cube < first_model);

        let expected: Vec<UniformValue> = viewer
            .registry()
            .iter()
            .map(|c| UniformValue::Mat4(cube_model_matrix(c.position, 0.5)))
            .collect();
        let models = uniform(&cmds, "model");
        // Three cube transforms followed by the two model transforms.
        assert_eq!(models.len(), 5);
        for (got, want) in models.iter().zip(&expected) {
            assert_eq!(**got, *want);
        }
    }

    #[test]
    fn cube_draw_binds_its_shader_and_textures() {
        let (mut viewer, mut gfx) = setup();
        tap_space(&mut viewer);
        viewer.frame(0.1, &mut gfx);
        let cmds = gfx.take_commands();
        let assets = *viewer.assets();
        assert!(cmds.contains(&GfxCommand::DrawCube {
            shader: Some(assets.cube_shader),
            textures: [assets.diffuse, assets.specular],
        }));
        assert_eq!(uniform(&cmds, "diffuseMap"), vec![&UniformValue::Int(0)]);
        assert_eq!(uniform(&cmds, "specularMap"), vec![&UniformValue::Int(1)]);
        assert!(uniform(&cmds, "lightPos")
            .iter()
            .all(|v| **v == UniformValue::Vec3(LIGHT_POSITION)));
    }

    #[test]
    fn held_space_spawns_one_cube_across_frames() {
        let (mut viewer, mut gfx) = setup();
        viewer.input_mut().key_event(Key::Space, true);
        for i in 1..=10 {
            viewer.input_mut().key_event(Key::Space, true);
            viewer.frame(i as f32 * 0.016, &mut gfx);
        }
        assert_eq!(viewer.registry().len(), 1);
    }

    #[test]
    fn n_taps_spawn_n_cubes_on_grid() {
        let (mut viewer, mut gfx) = setup();
        for i in 1..=25 {
            tap_space(&mut viewer);
            viewer.frame(i as f32 * 0.016, &mut gfx);
        }
        assert_eq!(viewer.registry().len(), 25);
        let limit = SPAWN_EXTENT as f32;
        for cube in viewer.registry() {
            for c in cube.position.to_array() {
                assert!((-limit..=limit).contains(&c));
                assert_eq!(c.fract(), 0.0);
            }
        }
    }

    #[test]
    fn zero_delta_frame_changes_nothing() {
        let (mut viewer, mut gfx) = setup();
        tap_space(&mut viewer);
        viewer.frame(1.0, &mut gfx);
        viewer.input_mut().key_event(Key::W, true);

        let camera = *viewer.camera();
        let cubes = viewer.registry().len();
        let anim = viewer.animation().value();
        viewer.frame(1.0, &mut gfx);

        assert_eq!(viewer.timing().delta(), 0.0);
        assert_eq!(*viewer.camera(), camera);
        assert_eq!(viewer.registry().len(), cubes);
        assert_eq!(viewer.animation().value(), anim);
    }

    #[test]
    fn held_w_moves_forward_scaled_by_delta() {
        let (mut viewer, mut gfx) = setup();
        viewer.frame(1.0, &mut gfx);
        viewer.input_mut().key_event(Key::W, true);
        let start = viewer.camera().position;
        viewer.frame(1.5, &mut gfx);
        let moved = viewer.camera().position - start;
        let expected = viewer.camera().front() * viewer.camera().speed * 0.5;
        assert!((moved - expected).length() < 1e-5);

        let mut cam = *viewer.camera();
        cam.process_move(MoveDirection::Backward, 0.5);
        assert!((cam.position - start).length() < 1e-5);
    }

    #[test]
    fn animation_wraps_over_many_frames() {
        let (mut viewer, mut gfx) = setup();
        let mut prev = 0.0;
        let mut wrapped = false;
        for i in 1..=200 {
            viewer.frame(i as f32 * 0.1, &mut gfx);
            let v = viewer.animation().value();
            assert!((0.0..=ANIMATION_WRAP).contains(&v));
            if v < prev {
                assert_eq!(v, 0.0);
                wrapped = true;
            }
            prev = v;
        }
        assert!(wrapped);
    }

    #[test]
    fn animated_model_uses_pre_advance_value() {
        let (mut viewer, mut gfx) = setup();
        viewer.frame(2.0, &mut gfx);
        gfx.take_commands();
        let offset = viewer.animation().value();
        viewer.frame(3.0, &mut gfx);
        let cmds = gfx.take_commands();
        let models = uniform(&cmds, "model");
        assert_eq!(*models[0], UniformValue::Mat4(animated_model_matrix(offset)));
        assert_eq!(*models[1], UniformValue::Mat4(static_model_matrix()));
    }

    #[test]
    fn escape_requests_close() {
        let (mut viewer, mut gfx) = setup();
        viewer.input_mut().key_event(Key::Escape, true);
        assert!(!viewer.should_close());
        viewer.frame(0.1, &mut gfx);
        assert!(viewer.should_close());
    }

    #[test]
    fn scroll_changes_projection_fov() {
        let (mut viewer, mut gfx) = setup();
        let before = viewer.frame_matrices().projection;
        viewer.input_mut().scroll(10.0);
        viewer.frame(0.1, &mut gfx);
        assert_eq!(viewer.camera().zoom(), 35.0);
        assert_ne!(viewer.frame_matrices().projection, before);
    }

    #[test]
    fn resize_updates_aspect() {
        let (mut viewer, _) = setup();
        viewer.resize(1000, 500);
        assert_eq!(viewer.viewport(), (1000, 500));
        assert_eq!(viewer.aspect(), 2.0);
        viewer.resize(0, 0);
        assert_eq!(viewer.viewport(), (1, 1));
    }

    #[test]
    fn matrices_are_deterministic() {
        let (mut viewer, mut gfx) = setup();
        tap_space(&mut viewer);
        viewer.frame(0.3, &mut gfx);
        assert_eq!(viewer.frame_matrices(), viewer.frame_matrices());

        let pos = viewer.registry().get(0).unwrap().position;
        assert_eq!(cube_model_matrix(pos, 1.25), cube_model_matrix(pos, 1.25));
        assert_ne!(cube_model_matrix(pos, 1.25), cube_model_matrix(pos, 1.5));
        // Rotation never moves the cube's origin.
        let origin = cube_model_matrix(pos, 2.0).transform_point3(Vec3::ZERO);
        assert!((origin - pos).length() < 1e-5);
    }
}

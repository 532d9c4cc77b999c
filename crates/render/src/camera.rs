use cubeview_common::MoveDirection;
use glam::{Mat4, Vec3};

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Fly camera driven by yaw/pitch in degrees.
///
/// `front`, `right` and `up` are derived from yaw and pitch and refreshed by
/// every mutating call, so they are never stale when read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

impl Camera {
    /// Camera at `position` looking down -Z.
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            zoom: MAX_ZOOM,
            speed: 2.5,
            sensitivity: 0.1,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn process_move(&mut self, direction: MoveDirection, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            MoveDirection::Forward => self.position += self.front * velocity,
            MoveDirection::Backward => self.position -= self.front * velocity,
            MoveDirection::Left => self.position -= self.right * velocity,
            MoveDirection::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a cursor delta in pixels; `dy` is positive upward.
    pub fn process_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Scrolling up narrows the field of view.
    pub fn process_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
        assert!(approx(cam.front(), Vec3::NEG_Z));
        assert!(approx(cam.right(), Vec3::X));
        assert!(approx(cam.up(), Vec3::Y));
        assert_eq!(cam.zoom(), 45.0);
        let vp = cam.projection_matrix(800.0 / 600.0) * cam.view_matrix();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn camera_movement_follows_basis() {
        let mut cam = Camera::default();
        let start = cam.position;
        cam.process_move(MoveDirection::Forward, 1.0);
        assert!(approx(cam.position, start + Vec3::NEG_Z * 2.5));
        cam.process_move(MoveDirection::Right, 2.0);
        assert!(approx(cam.position, start + Vec3::NEG_Z * 2.5 + Vec3::X * 5.0));
        cam.process_move(MoveDirection::Backward, 1.0);
        cam.process_move(MoveDirection::Left, 2.0);
        assert!(approx(cam.position, start));
    }

    #[test]
    fn movement_uses_basis_at_time_of_call() {
        let mut a = Camera::default();
        a.process_move(MoveDirection::Forward, 1.0);
        a.process_mouse_delta(900.0, 0.0);
        a.process_move(MoveDirection::Forward, 1.0);

        let mut b = Camera::default();
        b.process_mouse_delta(900.0, 0.0);
        b.process_move(MoveDirection::Forward, 1.0);
        b.process_move(MoveDirection::Forward, 1.0);

        // Yaw of 90 degrees turns front from -Z to +X.
        assert!(approx(a.position, Vec3::new(2.5, 0.0, 0.5)));
        assert!(approx(b.position, Vec3::new(5.0, 0.0, 3.0)));
    }

    #[test]
    fn zero_dt_does_not_move() {
        let mut cam = Camera::default();
        for dir in [
            MoveDirection::Forward,
            MoveDirection::Backward,
            MoveDirection::Left,
            MoveDirection::Right,
        ] {
            cam.process_move(dir, 0.0);
        }
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut cam = Camera::default();
        for dy in [1e6, -3.0, 500.0, -1e7, 42.0, f32::MAX / 2.0, -f32::MAX / 2.0] {
            cam.process_mouse_delta(dy * 0.5, dy);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&cam.pitch()));
            assert!(cam.front().is_finite());
        }
    }

    #[test]
    fn zoom_stays_clamped() {
        let mut cam = Camera::default();
        for dy in [3.0, 100.0, -7.5, -1e9, 0.25, 1e9] {
            cam.process_scroll(dy);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&cam.zoom()));
        }
        cam.process_scroll(-1000.0);
        assert_eq!(cam.zoom(), MAX_ZOOM);
        cam.process_scroll(1000.0);
        assert_eq!(cam.zoom(), MIN_ZOOM);
    }

    #[test]
    fn basis_is_orthonormal_after_look() {
        let mut cam = Camera::default();
        cam.process_mouse_delta(123.0, -45.0);
        assert!((cam.front().length() - 1.0).abs() < 1e-5);
        assert!(cam.front().dot(cam.right()).abs() < 1e-5);
        assert!(cam.front().dot(cam.up()).abs() < 1e-5);
        assert!(cam.right().dot(cam.up()).abs() < 1e-5);
    }

    #[test]
    fn view_matrix_is_pure() {
        let mut cam = Camera::default();
        cam.process_mouse_delta(10.0, 5.0);
        assert_eq!(cam.view_matrix(), cam.view_matrix());
        assert_eq!(cam.projection_matrix(1.5), cam.projection_matrix(1.5));
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let cam = Camera::default();
        let eye = cam.view_matrix().transform_point3(cam.position);
        assert!(approx(eye, Vec3::ZERO));
    }
}

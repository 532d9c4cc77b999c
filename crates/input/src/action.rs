use cubeview_common::MoveDirection;

/// A high-level command produced by the input mapper.
///
/// The viewer consumes actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move the camera one frame's worth in a direction.
    Move(MoveDirection),
    /// Rotate the camera by a cursor delta in pixels. `dy` is positive upward.
    Look { dx: f32, dy: f32 },
    /// Scroll-wheel delta applied to the field of view.
    Zoom(f32),
    /// Spawn one cube at a random position.
    SpawnCube,
    /// Request the run loop to close.
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_move_is_constructible() {
        let a = Action::Move(MoveDirection::Forward);
        assert!(matches!(a, Action::Move(MoveDirection::Forward)));
    }

    #[test]
    fn action_look_carries_delta() {
        let a = Action::Look { dx: 1.0, dy: -2.0 };
        assert_eq!(a, Action::Look { dx: 1.0, dy: -2.0 });
    }
}

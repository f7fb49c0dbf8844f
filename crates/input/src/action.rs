use alchemy_camera::CameraMovement;

/// A high-level action produced by a key binding.
///
/// The frame loop consumes actions, never raw key codes, so rebinding keys
/// never touches camera logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the camera while the key is held.
    Move(CameraMovement),
    /// Close the window.
    Quit,
}

impl Action {
    /// The movement direction, if this is a movement action.
    pub fn movement(self) -> Option<CameraMovement> {
        match self {
            Action::Move(direction) => Some(direction),
            Action::Quit => None,
        }
    }
}

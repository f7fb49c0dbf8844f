use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use alchemy_camera::{Camera, CameraMovement};
use winit::keyboard::KeyCode;

use crate::Action;

/// Set of currently held keys.
#[derive(Debug, Clone)]
pub struct PressedKeys<K> {
    keys: HashSet<K>,
}

impl<K> Default for PressedKeys<K> {
    fn default() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash> PressedKeys<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` held. Returns true if it was not already held.
    pub fn press(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    /// Mark `key` released. Returns true if it was held.
    pub fn release(&mut self, key: &K) -> bool {
        self.keys.remove(key)
    }

    /// Apply a press or release event.
    pub fn set(&mut self, key: K, pressed: bool) {
        if pressed {
            self.press(key);
        } else {
            self.release(&key);
        }
    }

    pub fn is_pressed(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Forget every held key, e.g. when the window loses focus and release
    /// events will not arrive.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }
}

/// Key to action map.
#[derive(Debug, Clone)]
pub struct KeyBindings<K> {
    map: HashMap<K, Action>,
}

impl<K: Eq + Hash> KeyBindings<K> {
    /// Bindings with no keys bound.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind `key` to `action`, returning the action it replaced.
    pub fn bind(&mut self, key: K, action: Action) -> Option<Action> {
        let previous = self.map.insert(key, action);
        if let Some(old) = previous.filter(|old| *old != action) {
            tracing::debug!(?old, new = ?action, "key rebound");
        }
        previous
    }

    pub fn unbind(&mut self, key: &K) -> Option<Action> {
        self.map.remove(key)
    }

    pub fn action_for(&self, key: &K) -> Option<Action> {
        self.map.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl KeyBindings<KeyCode> {
    /// W/S forward and back, A/D strafe, U/J up and down, Escape quits.
    pub fn desktop() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(KeyCode::KeyW, Action::Move(CameraMovement::Forward));
        bindings.bind(KeyCode::KeyS, Action::Move(CameraMovement::Backward));
        bindings.bind(KeyCode::KeyA, Action::Move(CameraMovement::Left));
        bindings.bind(KeyCode::KeyD, Action::Move(CameraMovement::Right));
        bindings.bind(KeyCode::KeyU, Action::Move(CameraMovement::Up));
        bindings.bind(KeyCode::KeyJ, Action::Move(CameraMovement::Down));
        bindings.bind(KeyCode::Escape, Action::Quit);
        bindings
    }
}

impl Default for KeyBindings<KeyCode> {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Movement directions with at least one held key, in
/// [`CameraMovement::ALL`] order. Each direction appears once even when
/// several held keys map to it.
pub fn held_movements<K: Eq + Hash>(
    keys: &PressedKeys<K>,
    bindings: &KeyBindings<K>,
) -> Vec<CameraMovement> {
    let held: HashSet<CameraMovement> = keys
        .iter()
        .filter_map(|key| bindings.action_for(key).and_then(Action::movement))
        .collect();
    CameraMovement::ALL
        .into_iter()
        .filter(|direction| held.contains(direction))
        .collect()
}

/// Move the camera once per held direction. Opposite directions cancel.
pub fn apply_held_movement<K: Eq + Hash>(
    camera: &mut Camera,
    keys: &PressedKeys<K>,
    bindings: &KeyBindings<K>,
    delta_time: f32,
) {
    for direction in held_movements(keys, bindings) {
        camera.process_keyboard(direction, delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn press_and_release() {
        let mut keys = PressedKeys::new();
        assert!(keys.press(KeyCode::KeyW));
        assert!(!keys.press(KeyCode::KeyW));
        assert!(keys.is_pressed(&KeyCode::KeyW));
        assert_eq!(keys.len(), 1);

        assert!(keys.release(&KeyCode::KeyW));
        assert!(!keys.release(&KeyCode::KeyW));
        assert!(keys.is_empty());
    }

    #[test]
    fn set_and_clear() {
        let mut keys = PressedKeys::new();
        keys.set(KeyCode::KeyA, true);
        keys.set(KeyCode::KeyD, true);
        keys.set(KeyCode::KeyA, false);
        assert!(!keys.is_pressed(&KeyCode::KeyA));
        assert!(keys.is_pressed(&KeyCode::KeyD));
        keys.clear();
        assert!(keys.is_empty());
    }

    #[test]
    fn any_key_identifier_is_accepted() {
        let mut keys: PressedKeys<u32> = PressedKeys::new();
        keys.press(u32::MAX);
        keys.press(5_000);
        assert!(keys.is_pressed(&u32::MAX));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn desktop_bindings() {
        let bindings = KeyBindings::desktop();
        assert_eq!(bindings.len(), 7);
        assert_eq!(
            bindings.action_for(&KeyCode::KeyU),
            Some(Action::Move(CameraMovement::Up))
        );
        assert_eq!(bindings.action_for(&KeyCode::Escape), Some(Action::Quit));
        assert_eq!(bindings.action_for(&KeyCode::KeyQ), None);
    }

    #[test]
    fn rebind_replaces_previous_action() {
        let mut bindings = KeyBindings::desktop();
        let old = bindings.bind(KeyCode::KeyW, Action::Move(CameraMovement::Up));
        assert_eq!(old, Some(Action::Move(CameraMovement::Forward)));
        assert_eq!(bindings.unbind(&KeyCode::KeyW), Some(Action::Move(CameraMovement::Up)));
        assert_eq!(bindings.action_for(&KeyCode::KeyW), None);
    }

    #[test]
    fn held_movements_in_fixed_order_without_duplicates() {
        let mut bindings = KeyBindings::desktop();
        bindings.bind(KeyCode::ArrowUp, Action::Move(CameraMovement::Forward));

        let mut keys = PressedKeys::new();
        keys.press(KeyCode::KeyJ);
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::ArrowUp);
        keys.press(KeyCode::Escape);
        keys.press(KeyCode::KeyQ);

        assert_eq!(
            held_movements(&keys, &bindings),
            vec![CameraMovement::Forward, CameraMovement::Down]
        );
    }

    #[test]
    fn apply_held_movement_moves_camera() {
        let bindings = KeyBindings::desktop();
        let mut keys = PressedKeys::new();
        keys.press(KeyCode::KeyU);

        let mut camera = Camera::new(Vec3::ZERO);
        apply_held_movement(&mut camera, &keys, &bindings, 0.5);
        assert!((camera.position().y - camera.movement_speed() * 0.5).abs() < 1e-5);
    }

    #[test]
    fn opposite_keys_cancel() {
        let bindings = KeyBindings::desktop();
        let mut keys = PressedKeys::new();
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::KeyS);

        let mut camera = Camera::new(Vec3::ZERO);
        apply_held_movement(&mut camera, &keys, &bindings, 1.0);
        assert!(camera.position().length() < 1e-5);
    }
}

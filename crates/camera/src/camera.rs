use alchemy_common::{CameraConfig, ProjectionConfig};
use glam::{Mat4, Vec3};

/// Pitch limit in degrees when pitch is constrained. Past ±90 the up vector
/// would invert.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view in degrees.
pub const MIN_ZOOM: f32 = 1.0;
/// Widest field of view in degrees.
pub const MAX_ZOOM: f32 = 45.0;

/// Direction of a keyboard-driven camera move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    /// Along world up, independent of pitch.
    Up,
    /// Against world up, independent of pitch.
    Down,
}

impl CameraMovement {
    pub const ALL: [CameraMovement; 6] = [
        CameraMovement::Forward,
        CameraMovement::Backward,
        CameraMovement::Left,
        CameraMovement::Right,
        CameraMovement::Up,
        CameraMovement::Down,
    ];
}

/// Free-fly camera driven by keyboard, cursor, and scroll input.
///
/// Yaw, pitch, and zoom are stored in degrees. The basis vectors are derived
/// state and are recomputed after every orientation change, so they are
/// only exposed through accessors.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// Camera at `position` with default orientation and tuning.
    pub fn new(position: Vec3) -> Self {
        Self::from_config(&CameraConfig {
            position,
            ..CameraConfig::default()
        })
    }

    /// Build a camera from configuration. Out-of-range pitch and zoom are
    /// clamped; non-finite values fall back to defaults.
    pub fn from_config(config: &CameraConfig) -> Self {
        let defaults = CameraConfig::default();
        let world_up = config.world_up.try_normalize().unwrap_or(Vec3::Y);
        let position = if config.position.is_finite() {
            config.position
        } else {
            defaults.position
        };

        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw: wrap_degrees(finite_or(config.yaw, defaults.yaw)),
            pitch: finite_or(config.pitch, defaults.pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT),
            zoom: finite_or(config.zoom, defaults.zoom).clamp(MIN_ZOOM, MAX_ZOOM),
            movement_speed: finite_or(config.movement_speed, defaults.movement_speed),
            mouse_sensitivity: finite_or(config.mouse_sensitivity, defaults.mouse_sensitivity),
        };
        camera.update_vectors();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
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

    pub fn world_up(&self) -> Vec3 {
        self.world_up
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

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    /// Unit vector a move in `direction` travels along.
    pub fn movement_vector(&self, direction: CameraMovement) -> Vec3 {
        match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Left => -self.right,
            CameraMovement::Right => self.right,
            CameraMovement::Up => self.world_up,
            CameraMovement::Down => -self.world_up,
        }
    }

    /// Move `movement_speed * delta_time` units in `direction`.
    ///
    /// `delta_time` is elapsed seconds; negative or non-finite values are
    /// treated as zero.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let delta_time = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };
        let velocity = self.movement_speed * delta_time;
        self.position += self.movement_vector(direction) * velocity;
    }

    /// Turn the camera by cursor offsets (already y-reversed, so positive
    /// `y_offset` looks up).
    ///
    /// Yaw is kept in [-180, 180). With `constrain_pitch`, pitch is clamped
    /// to ±[`PITCH_LIMIT`], otherwise it wraps like yaw. Non-finite offsets
    /// are ignored.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        if !x_offset.is_finite() || !y_offset.is_finite() {
            tracing::trace!(x_offset, y_offset, "ignoring non-finite mouse offset");
            return;
        }

        let yaw = self.yaw + x_offset * self.mouse_sensitivity;
        let pitch = self.pitch + y_offset * self.mouse_sensitivity;
        if !yaw.is_finite() || !pitch.is_finite() {
            tracing::trace!(x_offset, y_offset, "ignoring overflowing mouse offset");
            return;
        }

        self.yaw = wrap_degrees(yaw);
        self.pitch = if constrain_pitch {
            let clamped = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
            if clamped != pitch {
                tracing::trace!(requested = pitch, clamped, "pitch clamped");
            }
            clamped
        } else {
            wrap_degrees(pitch)
        };

        self.update_vectors();
    }

    /// Narrow (positive `y_offset`) or widen the field of view, clamped to
    /// [[`MIN_ZOOM`], [`MAX_ZOOM`]].
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        if !y_offset.is_finite() {
            tracing::trace!(y_offset, "ignoring non-finite scroll offset");
            return;
        }
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Right-handed look-at transform from world to eye space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Right-handed perspective with `zoom` as the vertical field of view.
    /// A non-positive aspect ratio is replaced with 1.
    pub fn projection_matrix(&self, aspect: f32, projection: &ProjectionConfig) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        Mat4::perspective_rh(
            self.zoom.to_radians(),
            aspect,
            projection.near,
            projection.far,
        )
    }

    pub fn view_projection(&self, aspect: f32, projection: &ProjectionConfig) -> Mat4 {
        self.projection_matrix(aspect, projection) * self.view_matrix()
    }

    /// Recompute `front`, `right`, `up` from yaw and pitch.
    ///
    /// `right = front × world_up`; swapping the operands mirrors the
    /// left/right controls.
    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();

        // Only reachable with unconstrained pitch at exactly ±90°.
        let right = front
            .cross(self.world_up)
            .try_normalize()
            .or_else(|| front.cross(self.up).try_normalize())
            .unwrap_or_else(|| front.any_orthonormal_vector());

        self.front = front;
        self.right = right;
        self.up = right.cross(front).normalize();
    }
}

/// Map an angle in degrees into [-180, 180). Keeps accumulated yaw small
/// enough that small offsets still register.
fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn assert_orthonormal(cam: &Camera) {
        let (f, r, u) = (cam.front(), cam.right(), cam.up());
        assert!((f.length() - 1.0).abs() < EPS, "front not unit: {f}");
        assert!((r.length() - 1.0).abs() < EPS, "right not unit: {r}");
        assert!((u.length() - 1.0).abs() < EPS, "up not unit: {u}");
        assert!(f.dot(r).abs() < EPS, "front·right = {}", f.dot(r));
        assert!(f.dot(u).abs() < EPS, "front·up = {}", f.dot(u));
        assert!(r.dot(u).abs() < EPS, "right·up = {}", r.dot(u));
    }

    /// Deterministic pseudo-random offsets in [-range, range).
    fn offsets(count: usize, range: f32) -> Vec<(f32, f32)> {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 40) as f32 / (1u64 << 24) as f32) * 2.0 * range - range
        };
        (0..count).map(|_| (next(), next())).collect()
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert_eq!(cam.zoom(), 45.0);
        assert!((cam.front() - Vec3::NEG_Z).length() < EPS);
        assert!((cam.right() - Vec3::X).length() < EPS);
        assert!((cam.up() - Vec3::Y).length() < EPS);
        assert_orthonormal(&cam);
    }

    #[test]
    fn forward_moves_along_front() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.process_keyboard(CameraMovement::Forward, 2.0);
        let expected = Vec3::NEG_Z * cam.movement_speed() * 2.0;
        assert!((cam.position() - expected).length() < EPS);
    }

    #[test]
    fn left_right_use_right_vector() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.process_keyboard(CameraMovement::Right, 1.0);
        assert!(cam.position().x > 0.0);
        cam.process_keyboard(CameraMovement::Left, 2.0);
        assert!(cam.position().x < 0.0);
    }

    #[test]
    fn zero_delta_time_is_idempotent() {
        let mut cam = Camera::default();
        let start = cam.position();
        for dir in CameraMovement::ALL {
            cam.process_keyboard(dir, 0.0);
        }
        assert_eq!(cam.position(), start);
    }

    #[test]
    fn negative_or_nan_delta_time_does_not_move() {
        let mut cam = Camera::default();
        let start = cam.position();
        cam.process_keyboard(CameraMovement::Forward, -1.0);
        cam.process_keyboard(CameraMovement::Forward, f32::NAN);
        cam.process_keyboard(CameraMovement::Forward, f32::INFINITY);
        assert_eq!(cam.position(), start);
    }

    #[test]
    fn vertical_movement_follows_world_up_regardless_of_pitch() {
        for (dx, dy) in [(0.0, 300.0), (0.0, -300.0), (450.0, 120.0), (-77.0, -35.0)] {
            let mut cam = Camera::new(Vec3::ZERO);
            cam.process_mouse_movement(dx, dy, true);

            cam.process_keyboard(CameraMovement::Up, 1.0);
            let up_move = cam.position();
            assert!(up_move.cross(Vec3::Y).length() < EPS, "moved off-axis: {up_move}");
            assert!((up_move.y - cam.movement_speed()).abs() < EPS);

            cam.process_keyboard(CameraMovement::Down, 1.0);
            assert!(cam.position().length() < EPS);
        }
    }

    #[test]
    fn pitch_clamps_to_limit() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(0.0, 100.0 / cam.mouse_sensitivity(), true);
        assert_eq!(cam.pitch(), 89.0);

        cam.process_mouse_movement(0.0, -1.0e9, true);
        assert_eq!(cam.pitch(), -89.0);
    }

    #[test]
    fn mouse_offset_scaled_by_sensitivity() {
        // With sensitivity 0.1, an offset of 100 is 10 degrees.
        let mut cam = Camera::default();
        cam.process_mouse_movement(100.0, 100.0, true);
        assert!((cam.yaw() - -80.0).abs() < EPS);
        assert!((cam.pitch() - 10.0).abs() < EPS);
    }

    #[test]
    fn pitch_offset_of_one_hundred_degrees_clamps_to_89() {
        let mut cam = Camera::from_config(&CameraConfig {
            mouse_sensitivity: 1.0,
            ..CameraConfig::default()
        });
        cam.process_mouse_movement(0.0, 100.0, true);
        assert_eq!(cam.pitch(), 89.0);
        assert_orthonormal(&cam);
    }

    #[test]
    fn unconstrained_pitch_passes_through() {
        let mut cam = Camera::from_config(&CameraConfig {
            mouse_sensitivity: 1.0,
            ..CameraConfig::default()
        });
        cam.process_mouse_movement(0.0, 100.0, false);
        assert_eq!(cam.pitch(), 100.0);
        assert_orthonormal(&cam);
    }

    #[test]
    fn constrained_pitch_stays_in_range_for_any_sequence() {
        let mut cam = Camera::default();
        for (dx, dy) in offsets(2_000, 5_000.0) {
            cam.process_mouse_movement(dx, dy, true);
            assert!(cam.pitch() >= -PITCH_LIMIT && cam.pitch() <= PITCH_LIMIT);
        }
    }

    #[test]
    fn basis_stays_orthonormal_for_any_sequence() {
        let mut cam = Camera::default();
        for (dx, dy) in offsets(1_000, 800.0) {
            cam.process_mouse_movement(dx, dy, true);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn unconstrained_basis_survives_vertical_front() {
        let mut cam = Camera::from_config(&CameraConfig {
            mouse_sensitivity: 1.0,
            ..CameraConfig::default()
        });
        cam.process_mouse_movement(0.0, 90.0, false);
        assert_orthonormal(&cam);
        assert!(!cam.view_matrix().is_nan());
    }

    #[test]
    fn non_finite_mouse_offsets_are_ignored() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(f32::NAN, 1.0, true);
        cam.process_mouse_movement(1.0, f32::INFINITY, true);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert_orthonormal(&cam);
    }

    #[test]
    fn extreme_yaw_offsets_keep_basis_finite() {
        let mut cam = Camera::default();
        for _ in 0..20 {
            cam.process_mouse_movement(f32::MAX, 0.0, true);
            assert!(cam.yaw().is_finite());
            assert!((-180.0..180.0).contains(&cam.yaw()));
            assert!(cam.front().is_finite());
            assert_orthonormal(&cam);
        }
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn small_turn_registers_after_huge_offset() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(1.0e10, 0.0, true);
        let before = cam.front();
        let yaw_before = cam.yaw();

        // 10 degrees at sensitivity 0.1.
        cam.process_mouse_movement(100.0, 0.0, true);
        assert!((cam.front() - before).length() > 0.1);
        let turned = wrap_degrees(cam.yaw() - yaw_before);
        assert!((turned - 10.0).abs() < 1e-3, "turned {turned} degrees");
    }

    #[test]
    fn yaw_wraps_into_half_open_range() {
        assert_eq!(wrap_degrees(-90.0), -90.0);
        assert_eq!(wrap_degrees(180.0), -180.0);
        assert_eq!(wrap_degrees(270.0), -90.0);
        assert_eq!(wrap_degrees(-540.0), -180.0);

        let cam = Camera::from_config(&CameraConfig {
            yaw: 630.0,
            ..CameraConfig::default()
        });
        assert_eq!(cam.yaw(), -90.0);
        assert!((cam.front() - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn scroll_zoom_clamps() {
        let mut cam = Camera::default();
        cam.process_mouse_scroll(10.0);
        assert_eq!(cam.zoom(), 35.0);
        cam.process_mouse_scroll(1_000.0);
        assert_eq!(cam.zoom(), MIN_ZOOM);
        cam.process_mouse_scroll(-1_000.0);
        assert_eq!(cam.zoom(), MAX_ZOOM);
        cam.process_mouse_scroll(f32::NAN);
        assert_eq!(cam.zoom(), MAX_ZOOM);
    }

    #[test]
    fn zoom_stays_in_range_for_any_sequence() {
        let mut cam = Camera::default();
        for (a, b) in offsets(500, 100.0) {
            cam.process_mouse_scroll(a);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&cam.zoom()));
            cam.process_mouse_scroll(b);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&cam.zoom()));
        }
    }

    #[test]
    fn from_config_clamps_and_sanitizes() {
        let cam = Camera::from_config(&CameraConfig {
            pitch: 120.0,
            zoom: 90.0,
            yaw: f32::NAN,
            world_up: Vec3::ZERO,
            ..CameraConfig::default()
        });
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        assert_eq!(cam.zoom(), MAX_ZOOM);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.world_up(), Vec3::Y);
        assert_orthonormal(&cam);
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let cam = Camera::default();
        let target = cam.position() + cam.front() * 5.0;
        let eye_space = cam.view_matrix().transform_point3(target);
        assert!((eye_space - Vec3::new(0.0, 0.0, -5.0)).length() < EPS);

        let origin = cam.view_matrix().transform_point3(cam.position());
        assert!(origin.length() < EPS);
    }

    #[test]
    fn view_projection_is_finite() {
        let cam = Camera::default();
        let vp = cam.view_projection(800.0 / 600.0, &ProjectionConfig::default());
        assert!(vp.is_finite());
        let degenerate = cam.projection_matrix(0.0, &ProjectionConfig::default());
        assert!(degenerate.is_finite());
    }
}

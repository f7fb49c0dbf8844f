/// Turns absolute cursor positions into per-event offsets for mouse look.
///
/// Window y grows downward while pitch grows upward, so the y offset is
/// reversed. The first position after construction or [`reset`](Self::reset)
/// only establishes the reference point and yields a zero offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorTracker {
    last_x: f64,
    last_y: f64,
    first_event: bool,
}

impl CursorTracker {
    /// Tracker whose reference point is the centre of a `width`×`height`
    /// window.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            last_x: width as f64 / 2.0,
            last_y: height as f64 / 2.0,
            first_event: true,
        }
    }

    /// Record a cursor position and return `(x_offset, y_offset)` since the
    /// previous one.
    pub fn offset(&mut self, x: f64, y: f64) -> (f32, f32) {
        if !x.is_finite() || !y.is_finite() {
            return (0.0, 0.0);
        }
        if self.first_event {
            self.first_event = false;
            self.last_x = x;
            self.last_y = y;
            return (0.0, 0.0);
        }

        let x_offset = x - self.last_x;
        let y_offset = self.last_y - y;
        self.last_x = x;
        self.last_y = y;
        (x_offset as f32, y_offset as f32)
    }

    /// Treat the next position as a fresh reference, e.g. after the cursor
    /// re-enters the window.
    pub fn reset(&mut self) {
        self.first_event = true;
    }

    pub fn last_position(&self) -> (f64, f64) {
        (self.last_x, self.last_y)
    }
}

/// Which event stream drives mouse look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookMode {
    /// Cursor is visible and free; absolute positions are tracked.
    Free,
    /// Cursor is hidden and grabbed; raw device motion is used, since a
    /// grabbed cursor stops reporting positions at the window edge.
    Captured,
}

/// Routes cursor positions or raw device motion to look offsets, depending
/// on whether the cursor is captured. Offsets come out y-reversed either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseLook {
    mode: LookMode,
    tracker: CursorTracker,
}

impl MouseLook {
    pub fn new(mode: LookMode, width: u32, height: u32) -> Self {
        Self {
            mode,
            tracker: CursorTracker::centered(width, height),
        }
    }

    pub fn mode(&self) -> LookMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LookMode) {
        if mode != self.mode {
            tracing::debug!(?mode, "mouse look mode changed");
            self.mode = mode;
            self.tracker.reset();
        }
    }

    /// Offsets from an absolute cursor position. `None` while captured.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        match self.mode {
            LookMode::Free => Some(self.tracker.offset(x, y)),
            LookMode::Captured => None,
        }
    }

    /// Offsets from raw device motion. `None` unless captured.
    pub fn raw_motion(&self, dx: f64, dy: f64) -> Option<(f32, f32)> {
        match self.mode {
            LookMode::Captured if dx.is_finite() && dy.is_finite() => {
                Some((dx as f32, -dy as f32))
            }
            _ => None,
        }
    }

    /// Forget the cursor reference, e.g. after focus loss or re-entry.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_window_centre() {
        let tracker = CursorTracker::centered(800, 600);
        assert_eq!(tracker.last_position(), (400.0, 300.0));
    }

    #[test]
    fn first_event_yields_zero() {
        let mut tracker = CursorTracker::centered(800, 600);
        assert_eq!(tracker.offset(10.0, 10.0), (0.0, 0.0));
        assert_eq!(tracker.last_position(), (10.0, 10.0));
    }

    #[test]
    fn y_offset_is_reversed() {
        let mut tracker = CursorTracker::centered(800, 600);
        tracker.offset(400.0, 300.0);
        // Moving right and down the screen: yaw right, pitch down.
        assert_eq!(tracker.offset(410.0, 320.0), (10.0, -20.0));
        assert_eq!(tracker.offset(405.0, 300.0), (-5.0, 20.0));
    }

    #[test]
    fn reset_reestablishes_reference() {
        let mut tracker = CursorTracker::centered(800, 600);
        tracker.offset(0.0, 0.0);
        tracker.reset();
        assert_eq!(tracker.offset(700.0, 500.0), (0.0, 0.0));
        assert_eq!(tracker.offset(701.0, 500.0), (1.0, 0.0));
    }

    #[test]
    fn non_finite_positions_are_ignored() {
        let mut tracker = CursorTracker::centered(800, 600);
        tracker.offset(1.0, 1.0);
        assert_eq!(tracker.offset(f64::NAN, 2.0), (0.0, 0.0));
        assert_eq!(tracker.offset(2.0, 2.0), (1.0, -1.0));
    }

    #[test]
    fn captured_look_is_unbounded() {
        let mut look = MouseLook::new(LookMode::Captured, 800, 600);
        // A grabbed cursor pinned at the right edge keeps reporting the same
        // position; raw motion still turns.
        assert_eq!(look.cursor_moved(799.0, 300.0), None);
        assert_eq!(look.cursor_moved(799.0, 300.0), None);
        let mut yaw_offset = 0.0;
        for _ in 0..1_000 {
            let (dx, dy) = look.raw_motion(5.0, 2.0).unwrap();
            assert_eq!(dy, -2.0);
            yaw_offset += dx;
        }
        assert_eq!(yaw_offset, 5_000.0);
    }

    #[test]
    fn free_look_tracks_cursor_and_ignores_raw_motion() {
        let mut look = MouseLook::new(LookMode::Free, 800, 600);
        assert_eq!(look.raw_motion(5.0, 5.0), None);
        assert_eq!(look.cursor_moved(400.0, 300.0), Some((0.0, 0.0)));
        assert_eq!(look.cursor_moved(410.0, 290.0), Some((10.0, 10.0)));
    }

    #[test]
    fn mode_change_resets_reference() {
        let mut look = MouseLook::new(LookMode::Captured, 800, 600);
        look.set_mode(LookMode::Free);
        assert_eq!(look.mode(), LookMode::Free);
        assert_eq!(look.cursor_moved(10.0, 10.0), Some((0.0, 0.0)));
        assert_eq!(
            MouseLook::new(LookMode::Captured, 800, 600).raw_motion(f64::NAN, 1.0),
            None
        );
    }
}

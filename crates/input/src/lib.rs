//! Desktop input: raw key and cursor events mapped to camera actions.
//!
//! # Invariants
//! - Held keys are a set; any key identifier is valid, none is out of range.
//! - The camera only sees actions and offsets, never raw window events.

pub mod action;
mod cursor;
mod keys;

pub use action::Action;
pub use cursor::{CursorTracker, LookMode, MouseLook};
pub use keys::{KeyBindings, PressedKeys, apply_held_movement, held_movements};

//! Scene and frame planning: what to draw and in which order.
//!
//! # Invariants
//! - The scene is fixed at construction; frames only reorder billboards.
//! - A frame plan lists every opaque command before any blended one, and
//!   blended commands back to front.
//! - Planning never touches a GPU; backends consume a finished plan.

mod plan;
mod renderer;
mod scene;

pub use plan::{BlendMode, DrawCommand, FramePlan, MeshKind, TextureSlot};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{Scene, demo_billboards};

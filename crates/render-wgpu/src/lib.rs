//! wgpu render backend for the alchemy demo.
//!
//! Executes a [`FramePlan`](alchemy_scene::FramePlan) in order: opaque
//! geometry with depth writes, then alpha-blended billboards with "over"
//! compositing.
//!
//! # Invariants
//! - The backend never reorders a plan's commands.
//! - A texture that fails to load is replaced by a sentinel, never fatal.

mod context;
mod error;
mod gpu;
mod mesh;
mod shaders;
mod texture;

pub use context::GpuContext;
pub use error::{RenderError, TextureError};
pub use gpu::{TextureSet, WgpuRenderer};
pub use texture::{
    TextureOptions, fallback_image, load_image, load_image_or_fallback, mip_chain,
};

//! Shared configuration vocabulary for the alchemy demo.
//!
//! Every value has a default matching the demo's stock tuning, so an
//! empty or partial JSON file is a valid configuration.

mod config;

pub use config::{
    CameraConfig, ConfigError, DemoConfig, DistanceMetric, ProjectionConfig, TextureConfig,
    WindowConfig,
};

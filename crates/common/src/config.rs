use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors from loading or saving a [`DemoConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown distance metric: {0:?} (expected \"euclidean\" or \"squared\")")]
    UnknownMetric(String),
}

/// Initial camera state and its fixed tuning constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub world_up: Vec3,
    /// Degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees per pixel of cursor motion.
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
        }
    }
}

/// Perspective projection planes. The field of view comes from the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Hide and grab the cursor; look then follows raw mouse motion, so it
    /// is not stopped by the window edge.
    pub capture_cursor: bool,
    pub clear_color: [f64; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "ALCHEMYgraph window".into(),
            width: 800,
            height: 600,
            resizable: false,
            capture_cursor: true,
            clear_color: [0.15, 0.0, 0.1, 0.0],
        }
    }
}

impl WindowConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Texture files, resolved relative to `dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub dir: PathBuf,
    pub cube: String,
    pub floor: String,
    pub transparent: String,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("textures"),
            cube: "stone.png".into(),
            floor: "chess.jpg".into(),
            transparent: "window.png".into(),
        }
    }
}

impl TextureConfig {
    pub fn cube_path(&self) -> PathBuf {
        self.dir.join(&self.cube)
    }

    pub fn floor_path(&self) -> PathBuf {
        self.dir.join(&self.floor)
    }

    pub fn transparent_path(&self) -> PathBuf {
        self.dir.join(&self.transparent)
    }
}

/// How billboard distance to the viewpoint is measured.
///
/// Both metrics are monotonic in true distance, so they produce the same
/// back-to-front order. `Squared` skips the square root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Squared,
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Squared => "squared",
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "squared" => Ok(DistanceMetric::Squared),
            other => Err(ConfigError::UnknownMetric(other.to_string())),
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete demo configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub textures: TextureConfig,
    pub sort_metric: DistanceMetric,
}

impl DemoConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: DemoConfig = serde_json::from_str(&data)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

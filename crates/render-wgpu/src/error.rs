use std::path::PathBuf;

/// Errors from decoding a texture file.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture at {path} has zero size")]
    Empty { path: PathBuf },
}

/// Errors from bringing up the GPU.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

use std::path::Path;

use image::{RgbaImage, imageops::FilterType};

use crate::error::TextureError;

/// Sampler settings for a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub min_filter: wgpu::FilterMode,
    pub mag_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::FilterMode,
    /// Only used with `ClampToBorder`. Defaults to opaque black.
    pub border_color: Option<wgpu::SamplerBorderColor>,
}

impl Default for TextureOptions {
    /// Repeat on both axes, trilinear filtering.
    fn default() -> Self {
        Self {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            min_filter: wgpu::FilterMode::Linear,
            mag_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            border_color: None,
        }
    }
}

impl TextureOptions {
    /// Defaults with the given address modes for U and V.
    pub fn with_address_modes(u: wgpu::AddressMode, v: wgpu::AddressMode) -> Self {
        Self {
            address_mode_u: u,
            address_mode_v: v,
            ..Self::default()
        }
    }

    pub fn uses_border(&self) -> bool {
        self.address_mode_u == wgpu::AddressMode::ClampToBorder
            || self.address_mode_v == wgpu::AddressMode::ClampToBorder
    }

    /// Replace `ClampToBorder` with `ClampToEdge` when the device lacks
    /// border support.
    pub(crate) fn supported_by(mut self, features: wgpu::Features) -> Self {
        if self.uses_border() && !features.contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER)
        {
            tracing::warn!("clamp-to-border unsupported on this device, using clamp-to-edge");
            for mode in [&mut self.address_mode_u, &mut self.address_mode_v] {
                if *mode == wgpu::AddressMode::ClampToBorder {
                    *mode = wgpu::AddressMode::ClampToEdge;
                }
            }
        }
        self
    }

    pub(crate) fn sampler_descriptor(&self, label: &'static str) -> wgpu::SamplerDescriptor<'static> {
        let border_color = if self.uses_border() {
            Some(
                self.border_color
                    .unwrap_or(wgpu::SamplerBorderColor::OpaqueBlack),
            )
        } else {
            None
        };
        wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: self.address_mode_u,
            address_mode_v: self.address_mode_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: self.mipmap_filter,
            border_color,
            ..Default::default()
        }
    }
}

/// Decode an image file into RGBA8. Grey, grey-alpha and RGB sources are
/// expanded.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbaImage, TextureError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if img.width() == 0 || img.height() == 0 {
        return Err(TextureError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(img.to_rgba8())
}

/// Load `path`, or log the failure and return [`fallback_image`].
pub fn load_image_or_fallback(path: impl AsRef<Path>) -> RgbaImage {
    let path = path.as_ref();
    match load_image(path) {
        Ok(img) => {
            tracing::info!(
                "loaded texture {} ({}x{})",
                path.display(),
                img.width(),
                img.height()
            );
            img
        }
        Err(e) => {
            tracing::warn!("{e}; using fallback texture");
            fallback_image()
        }
    }
}

/// 1x1 opaque magenta, used in place of textures that failed to load.
pub fn fallback_image() -> RgbaImage {
    RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 255, 255]))
}

/// The full mip chain of `base`, largest first, down to 1x1.
pub fn mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let mut levels = vec![base.clone()];
    let (mut width, mut height) = base.dimensions();
    while width > 1 || height > 1 {
        width = (width / 2).max(1);
        height = (height / 2).max(1);
        let next = image::imageops::resize(
            levels.last().unwrap_or(base),
            width,
            height,
            FilterType::Triangle,
        );
        levels.push(next);
    }
    levels
}

//! Textures the passes write to and read from.

use log::info;

use crate::error::{OceanError, Result};

/// Per-texel normal (xyz) and surface height (w); needs full float precision
pub const NORMAL_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Additively blended light accumulation
pub const CAUSTIC_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub const BOTTOM_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A texture together with its default view
pub struct Target {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Target {
    /// Create an off-screen color target written by one pass and sampled by later ones.
    ///
    /// Fails when the adapter cannot render to and sample from `format`.
    pub fn offscreen(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        label: &str,
        format: wgpu::TextureFormat,
        size: u32,
    ) -> Result<Self> {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;

        let features = adapter.get_texture_format_features(format);
        if !features.allowed_usages.contains(usage) {
            return Err(OceanError::IncompleteTarget {
                name: label.to_string(),
                reason: format!("{:?} does not support {:?}", format, usage),
            });
        }

        check_size(label, (size, size), device.limits().max_texture_dimension_2d)?;

        info!("{} target: {}x{} {:?}", label, size, size, format);
        Ok(Self::create(device, label, format, (size, size), usage))
    }

    /// Bottom color texture filled from RGBA8 pixels.
    ///
    /// Fails when the image exceeds the device's 2D texture limit.
    pub fn bottom(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &image::RgbaImage,
    ) -> Result<Self> {
        let (width, height) = image.dimensions();
        check_size(
            "Bottom Texture",
            (width, height),
            device.limits().max_texture_dimension_2d,
        )?;

        let target = Self::create(
            device,
            "Bottom Texture",
            BOTTOM_FORMAT,
            (width, height),
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent(width, height),
        );

        Ok(target)
    }

    /// Depth buffer for the composite pass, sized to the surface
    pub fn depth(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::create(
            device,
            "Depth Texture",
            DEPTH_FORMAT,
            (width.max(1), height.max(1)),
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        )
    }

    fn create(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    pub fn destroy(&self) {
        self.texture.destroy();
    }
}

/// Both sides must be in `1..=max`
pub fn check_size(name: &str, (width, height): (u32, u32), max: u32) -> Result<()> {
    let fits = |side: u32| (1..=max).contains(&side);
    if fits(width) && fits(height) {
        return Ok(());
    }

    Err(OceanError::IncompleteTarget {
        name: name.to_string(),
        reason: format!("size {}x{} outside 1..={}", width, height, max),
    })
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_within_limit() {
        assert!(check_size("Bottom Texture", (256, 256), 8192).is_ok());
        assert!(check_size("Bottom Texture", (8192, 1), 8192).is_ok());
    }

    #[test]
    fn test_oversized_bottom_is_incomplete() {
        let err = check_size("Bottom Texture", (9000, 9000), 8192).unwrap_err();
        match err {
            OceanError::IncompleteTarget { name, reason } => {
                assert_eq!(name, "Bottom Texture");
                assert!(reason.contains("9000x9000"), "{}", reason);
            }
            other => panic!("unexpected error: {}", other),
        }

        assert!(check_size("Bottom Texture", (512, 8193), 8192).is_err());
    }

    #[test]
    fn test_empty_size_is_incomplete() {
        assert!(check_size("Caustic", (0, 0), 8192).is_err());
    }
}

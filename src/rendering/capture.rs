//! One-shot still-image export of the composited frame.

use std::path::Path;
use std::sync::mpsc;

use log::info;

use crate::error::{OceanError, Result};

type MapResult = std::result::Result<(), wgpu::BufferAsyncError>;

/// Row pitch of a texture-to-buffer copy, rounded up to wgpu's alignment
pub fn padded_bytes_per_row(width: u32, bytes_per_pixel: u32) -> u32 {
    let unpadded = width * bytes_per_pixel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Strip row padding and convert to tightly packed RGBA8
pub fn unpad_rows(data: &[u8], width: u32, height: u32, padded_row: u32, bgra: bool) -> Vec<u8> {
    let row = (width * 4) as usize;
    let mut pixels = Vec::with_capacity(row * height as usize);

    for y in 0..height as usize {
        let start = y * padded_row as usize;
        pixels.extend_from_slice(&data[start..start + row]);
    }

    if bgra {
        pixels.chunks_exact_mut(4).for_each(|px| px.swap(0, 2));
    }
    pixels
}

/// Turn the outcome of a `map_async` callback into a readback error
fn check_mapping(received: std::result::Result<MapResult, mpsc::RecvError>) -> Result<()> {
    received
        .map_err(|_| OceanError::Readback("map_async callback channel closed".to_string()))?
        .map_err(|e| OceanError::Readback(format!("buffer map failed: {}", e)))
}

/// Copy `texture` (an RGBA8 or BGRA8 color texture) to disk as PNG
pub fn save_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    path: &Path,
) -> Result<()> {
    let width = texture.width();
    let height = texture.height();
    let padded_row = padded_bytes_per_row(width, 4);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Frame Capture Buffer"),
        size: (padded_row * height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Frame Capture Encoder"),
    });

    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (sender, receiver) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device.poll(wgpu::Maintain::Wait);

    if let Err(e) = check_mapping(receiver.recv()) {
        buffer.destroy();
        return Err(e);
    }

    let bgra = matches!(
        texture.format(),
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    );
    let pixels = {
        let data = slice.get_mapped_range();
        unpad_rows(&data, width, height, padded_row, bgra)
    };
    buffer.unmap();
    buffer.destroy();

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)?;
    info!("Saved {}x{} frame to {}", width, height, path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_padding() {
        assert_eq!(padded_bytes_per_row(64, 4), 256);
        assert_eq!(padded_bytes_per_row(65, 4), 512);
        assert_eq!(padded_bytes_per_row(1280, 4), 5120);
    }

    #[test]
    fn test_mapping_outcomes() {
        assert!(check_mapping(Ok(Ok(()))).is_ok());

        let failed = check_mapping(Ok(Err(wgpu::BufferAsyncError)));
        assert!(matches!(failed, Err(OceanError::Readback(_))));

        let (sender, receiver) = mpsc::channel::<MapResult>();
        drop(sender);
        let closed = check_mapping(receiver.recv());
        match closed {
            Err(OceanError::Readback(reason)) => assert!(reason.contains("channel closed")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unpad_and_swizzle() {
        let padded_row = 8;
        let data = [
            1, 2, 3, 4, 0, 0, 0, 0, // row 0 + padding
            5, 6, 7, 8, 0, 0, 0, 0, // row 1 + padding
        ];

        assert_eq!(unpad_rows(&data, 1, 2, padded_row, false), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(unpad_rows(&data, 1, 2, padded_row, true), vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }
}

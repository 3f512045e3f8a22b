//! Bottom texture source: an image file or a generated sand pattern.

use std::path::Path;

use image::{Rgba, RgbaImage};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;

const SAND_SEED: u64 = 0x5A4D;

/// Load the bottom image from `path`, or generate a `size`×`size` sand texture
pub fn load_bottom_image(path: Option<&Path>, size: u32) -> Result<RgbaImage> {
    match path {
        Some(path) => {
            let image = image::open(path)?.to_rgba8();
            info!(
                "Loaded bottom texture {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            Ok(image)
        }
        None => Ok(procedural_sand(size)),
    }
}

/// Warm sand with soft ripple bands and per-texel grain; identical on every call
pub fn procedural_sand(size: u32) -> RgbaImage {
    let size = size.max(1);
    let mut rng = StdRng::seed_from_u64(SAND_SEED);
    let base = [0.76f32, 0.66, 0.48];

    RgbaImage::from_fn(size, size, |x, y| {
        let u = x as f32 / size as f32;
        let v = y as f32 / size as f32;

        let ripple = (u * 23.0 + (v * 7.0).sin() * 1.5).sin() * 0.5 + 0.5;
        let grain: f32 = rng.gen_range(-0.06..0.06);
        let shade = 0.85 + 0.1 * ripple + grain;

        let channel = |c: f32| ((c * shade).clamp(0.0, 1.0) * 255.0) as u8;
        Rgba([channel(base[0]), channel(base[1]), channel(base[2]), 255])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedural_sand_is_deterministic() {
        let a = procedural_sand(32);
        let b = procedural_sand(32);
        assert_eq!(a.dimensions(), (32, 32));
        assert_eq!(a, b);
        assert!(a.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_procedural_sand_zero_size() {
        assert_eq!(procedural_sand(0).dimensions(), (1, 1));
    }

    #[test]
    fn test_load_without_path_generates() {
        let image = load_bottom_image(None, 16).unwrap();
        assert_eq!(image.dimensions(), (16, 16));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_bottom_image(Some(Path::new("does/not/exist.png")), 16);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_roundtrips_png() {
        let path = std::env::temp_dir().join(format!(
            "causticsea_load_roundtrips_png_{}.png",
            std::process::id()
        ));
        let image = procedural_sand(8);
        image.save(&path).unwrap();

        let loaded = load_bottom_image(Some(&path), 16).unwrap();
        assert_eq!(loaded, image);
        let _ = std::fs::remove_file(&path);
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image decoding for display.
//!
//! Downloaded image bytes are decoded into RGBA pixels that can be
//! uploaded as an egui texture.

use anyhow::{Context, Result};

/// A decoded image ready for display.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode an encoded image (PNG, JPEG, ...) into RGBA8 pixels.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage> {
    let decoded = image::load_from_memory(bytes).context("Failed to decode image")?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let source = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut encoded = Vec::new();
        image::DynamicImage::ImageRgba8(source)
            .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();

        let loaded = decode_image(&encoded).unwrap();
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&loaded.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"not an image").is_err());
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Shapes are kept as percentages of the displayed image (0 to 100 on each
//! axis), so they do not depend on the on-screen size of the image.

use crate::models::annotation::Geometry;

/// Convert a position relative to the displayed image into percentages,
/// clamped to the image.
pub fn to_percent(offset_x: f64, offset_y: f64, display_width: f64, display_height: f64) -> (f64, f64) {
    if display_width <= 0.0 || display_height <= 0.0 {
        return (0.0, 0.0);
    }
    (
        (offset_x / display_width * 100.0).clamp(0.0, 100.0),
        (offset_y / display_height * 100.0).clamp(0.0, 100.0),
    )
}

/// Convert a percentage geometry to an offset rectangle `(x, y, w, h)`
/// within an image displayed at the given size.
pub fn from_percent(geometry: &Geometry, display_width: f64, display_height: f64) -> (f64, f64, f64, f64) {
    (
        geometry.x / 100.0 * display_width,
        geometry.y / 100.0 * display_height,
        geometry.width / 100.0 * display_width,
        geometry.height / 100.0 * display_height,
    )
}

/// Largest size with the image's aspect ratio that fits the available area.
pub fn fit_size(image_width: u32, image_height: u32, available_width: f32, available_height: f32) -> (f32, f32) {
    if image_width == 0 || image_height == 0 || available_height <= 0.0 {
        return (0.0, 0.0);
    }
    let img_aspect = image_width as f32 / image_height as f32;
    let available_aspect = available_width / available_height;

    if img_aspect > available_aspect {
        // Image is wider - fit to width
        (available_width, available_width / img_aspect)
    } else {
        // Image is taller - fit to height
        (available_height * img_aspect, available_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_roundtrip() {
        let (px, py) = to_percent(480.0, 270.0, 960.0, 540.0);
        assert_eq!((px, py), (50.0, 50.0));

        let g = Geometry::new(px, py, 10.0, 20.0);
        let (x, y, w, h) = from_percent(&g, 960.0, 540.0);
        assert!((x - 480.0).abs() < 1e-9);
        assert!((y - 270.0).abs() < 1e-9);
        assert!((w - 96.0).abs() < 1e-9);
        assert!((h - 108.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(to_percent(-10.0, 2000.0, 100.0, 100.0), (0.0, 100.0));
        assert_eq!(to_percent(5.0, 5.0, 0.0, 100.0), (0.0, 0.0));
    }

    #[test]
    fn test_fit_size() {
        assert_eq!(fit_size(200, 100, 400.0, 400.0), (400.0, 200.0));
        assert_eq!(fit_size(100, 200, 400.0, 400.0), (200.0, 400.0));
        assert_eq!(fit_size(0, 200, 400.0, 400.0), (0.0, 0.0));
    }
}

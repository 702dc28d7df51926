//! Procedural input images, so the examples need no asset files.
use glam::Vec2;
use image::{GrayImage, Luma};

fn distance_to_center(size: u32, x: u32, y: u32) -> f32 {
    Vec2::new(x as f32, y as f32).distance(Vec2::splat(size as f32 / 2.0))
}

/// Solid black disk on white.
///
/// Keep the disk under half the frame; past that the mean drops below mid gray and the white
/// surround is segmented as the subject.
pub fn dark_disk(size: u32, radius: f32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        Luma([if distance_to_center(size, x, y) <= radius { 0 } else { 255 }])
    })
}

/// Solid black square `[margin, size - margin)` on white.
pub fn dark_square(size: u32, margin: u32) -> GrayImage {
    let inside = margin..size.saturating_sub(margin);
    GrayImage::from_fn(size, size, |x, y| {
        Luma([if inside.contains(&x) && inside.contains(&y) { 0 } else { 255 }])
    })
}

/// Disk that is black at the center and fades to mid gray at its rim, on white.
pub fn radial_gradient_disk(size: u32, radius: f32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        let d = distance_to_center(size, x, y);
        if d <= radius {
            Luma([(d / radius * 150.0) as u8])
        } else {
            Luma([255])
        }
    })
}

/// Thick dark ring with a dark bar through the middle.
pub fn ring_logo(size: u32) -> GrayImage {
    let outer = size as f32 * 0.42;
    let inner = size as f32 * 0.28;
    let bar = size as f32 * 0.06;
    let c = size as f32 / 2.0;
    GrayImage::from_fn(size, size, |x, y| {
        let d = distance_to_center(size, x, y);
        let on_ring = d >= inner && d <= outer;
        let on_bar = d <= outer && (y as f32 - c).abs() <= bar;
        Luma([if on_ring || on_bar { 20 } else { 245 }])
    })
}

#[cfg(test)]
mod tests {
    use rhinestone::field::detect_foreground;
    use rhinestone::field::mask::mean_brightness;

    use super::*;

    #[test]
    fn example_inputs_read_as_dark_on_light() {
        for (image, center) in [
            (dark_disk(200, 65.0), 100),
            (dark_disk(240, 80.0), 120),
            (dark_square(300, 60), 150),
            (radial_gradient_disk(400, 170.0), 200),
        ] {
            assert!(mean_brightness(&image) > 128.0);
            let mask = detect_foreground(&image, false);
            assert!(mask.is_foreground(center, center));
            assert!(!mask.is_foreground(2, 2));
        }
    }
}

//! Single-channel rasters for the foreground mask and the density map.
//!
//! Both wrap an [`image::GrayImage`], so they stay row-major flat buffers and can be handed
//! to `imageproc` without copying.
use glam::Vec2;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;

/// Mask value for pixels inside the shape.
pub const FOREGROUND: u8 = 255;
/// Mask value for background pixels.
pub const BACKGROUND: u8 = 0;

/// Binary foreground mask. Every pixel is either [`FOREGROUND`] or [`BACKGROUND`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    /// Binarize an arbitrary grayscale image: values above 127 become foreground.
    pub fn from_image(mut image: GrayImage) -> Self {
        for px in image.pixels_mut() {
            px.0[0] = if px.0[0] > 127 { FOREGROUND } else { BACKGROUND };
        }
        Self { image }
    }

    /// Build a mask from a predicate over pixel coordinates.
    pub fn from_fn(width: u32, height: u32, mut inside: impl FnMut(u32, u32) -> bool) -> Self {
        let image = GrayImage::from_fn(width, height, |x, y| {
            Luma([if inside(x, y) { FOREGROUND } else { BACKGROUND }])
        });
        Self { image }
    }

    /// An all-background mask.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Center of the raster in pixel coordinates.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width() as f32 / 2.0, self.height() as f32 / 2.0)
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// Returns `true` if the pixel is foreground. Out-of-bounds pixels are background.
    #[inline]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && self.image.get_pixel(x, y).0[0] > 127
    }

    /// Returns `true` if the point, rounded to the nearest pixel, lies on the foreground.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        if !p.x.is_finite() || !p.y.is_finite() {
            return false;
        }
        let xi = p.x.round();
        let yi = p.y.round();
        if xi < 0.0 || yi < 0.0 {
            return false;
        }
        self.is_foreground(xi as u32, yi as u32)
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.image.as_raw().iter().filter(|v| **v > 127).count()
    }

    /// Returns `true` if no pixel is foreground.
    pub fn is_blank(&self) -> bool {
        self.image.as_raw().iter().all(|v| *v <= 127)
    }

    /// Foreground pixel coordinates in row-major order.
    pub fn foreground_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width() as usize;
        self.image
            .as_raw()
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 127)
            .map(move |(i, _)| ((i % w) as u32, (i / w) as u32))
    }

    /// Shrink the foreground by `steps` passes of a 3×3 cross element.
    ///
    /// Repeated cross erosions are exactly an L1 ball erosion, so this is a single
    /// `imageproc` call. Pixels outside the raster do not erode the border.
    pub fn eroded(&self, steps: u32) -> Mask {
        if steps == 0 {
            return self.clone();
        }
        let k = steps.min(u8::MAX as u32) as u8;
        Self {
            image: imageproc::morphology::erode(&self.image, Norm::L1, k),
        }
    }
}

/// Per-pixel dot density, `0` (sparsest, smallest dots) to `255` (densest, largest dots).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DensityMap {
    image: GrayImage,
}

impl DensityMap {
    pub fn from_image(image: GrayImage) -> Self {
        Self { image }
    }

    /// A map with the same density everywhere.
    pub fn uniform(width: u32, height: u32, value: u8) -> Self {
        Self {
            image: GrayImage::from_pixel(width, height, Luma([value])),
        }
    }

    /// Copy of this map with every background pixel of `mask` forced to zero.
    pub fn restricted_to(&self, mask: &Mask) -> Self {
        let mut image = self.image.clone();
        for (px, m) in image.pixels_mut().zip(mask.as_image().pixels()) {
            if m.0[0] <= 127 {
                px.0[0] = 0;
            }
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// Density at a point in `[0, 1]`. Coordinates are truncated and clamped to the raster.
    #[inline]
    pub fn sample(&self, p: Vec2) -> f32 {
        let (w, h) = self.dimensions();
        if w == 0 || h == 0 {
            return 0.0;
        }
        let x = clamp_index(p.x, w);
        let y = clamp_index(p.y, h);
        self.image.get_pixel(x, y).0[0] as f32 / 255.0
    }
}

#[inline]
fn clamp_index(v: f32, len: u32) -> u32 {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        (v as u32).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(size: u32, radius: f32) -> Mask {
        let c = size as f32 / 2.0;
        Mask::from_fn(size, size, |x, y| {
            let dx = x as f32 - c;
            let dy = y as f32 - c;
            dx * dx + dy * dy <= radius * radius
        })
    }

    #[test]
    fn from_image_binarizes_at_midpoint() {
        let img = GrayImage::from_raw(4, 1, vec![0, 127, 128, 200]).unwrap();
        let mask = Mask::from_image(img);
        assert_eq!(mask.as_image().as_raw(), &vec![0, 0, 255, 255]);
        assert_eq!(mask.foreground_count(), 2);
    }

    #[test]
    fn contains_rounds_to_nearest_pixel() {
        let mask = Mask::from_fn(3, 3, |x, y| x == 1 && y == 1);
        assert!(mask.contains(Vec2::new(1.4, 0.6)));
        assert!(!mask.contains(Vec2::new(1.6, 1.0)));
        assert!(!mask.contains(Vec2::new(-0.6, 1.0)));
        assert!(!mask.contains(Vec2::new(f32::NAN, 1.0)));
        assert!(!mask.contains(Vec2::new(30.0, 1.0)));
    }

    #[test]
    fn foreground_pixels_are_row_major() {
        let mask = Mask::from_fn(3, 2, |x, y| (x + y) % 2 == 0);
        let px: Vec<_> = mask.foreground_pixels().collect();
        assert_eq!(px, vec![(0, 0), (2, 0), (1, 1)]);
    }

    #[test]
    fn erosion_shrinks_foreground_monotonically() {
        let mask = disk(41, 15.0);
        let once = mask.eroded(2);
        let twice = once.eroded(2);
        assert!(once.foreground_count() < mask.foreground_count());
        assert!(twice.foreground_count() < once.foreground_count());
        for (x, y) in twice.foreground_pixels() {
            assert!(once.is_foreground(x, y));
            assert!(mask.is_foreground(x, y));
        }
        assert_eq!(mask.eroded(0), mask);
    }

    #[test]
    fn density_sample_truncates_and_clamps() {
        let img = GrayImage::from_raw(2, 2, vec![0, 255, 51, 102]).unwrap();
        let density = DensityMap::from_image(img);
        assert_eq!(density.sample(Vec2::new(0.9, 0.9)), 0.0);
        assert_eq!(density.sample(Vec2::new(1.2, 0.0)), 1.0);
        assert!((density.sample(Vec2::new(-5.0, 7.0)) - 0.2).abs() < 1e-6);
        assert!((density.sample(Vec2::new(99.0, 99.0)) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn restricted_density_is_zero_outside_mask() {
        let mask = Mask::from_fn(4, 4, |x, _| x < 2);
        let density = DensityMap::uniform(4, 4, 200).restricted_to(&mask);
        for y in 0..4 {
            for x in 0..4 {
                let v = density.as_image().get_pixel(x, y).0[0];
                assert_eq!(v, if x < 2 { 200 } else { 0 });
            }
        }
    }
}

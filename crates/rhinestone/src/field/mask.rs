//! Foreground segmentation: Otsu threshold, polarity decision and morphological cleanup.
use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};
use tracing::debug;

use super::raster::{Mask, BACKGROUND, FOREGROUND};

/// Mean brightness above which the image is treated as a light background.
const LIGHT_BACKGROUND_MEAN: f64 = 128.0;

/// Radius of the opening element (3×3 cross).
const OPEN_RADIUS: u8 = 1;

/// Radius of the closing element. Two passes of a 5×5 disk compose to a radius-4 disk.
const CLOSE_RADIUS: u8 = 4;

/// Segment the subject of a grayscale image into a binary [`Mask`].
///
/// On a light background the darker Otsu class is the subject, otherwise the brighter one.
/// `invert` flips that decision.
pub fn detect_foreground(gray: &GrayImage, invert: bool) -> Mask {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return Mask::empty(w, h);
    }

    let level = otsu_level(gray);
    let mean = mean_brightness(gray);
    let dark_subject = mean > LIGHT_BACKGROUND_MEAN;
    debug!(
        "Otsu level {} | mean brightness {:.1} | dark subject: {}.",
        level, mean, dark_subject
    );

    let binary = GrayImage::from_fn(w, h, |x, y| {
        let bright = gray.get_pixel(x, y).0[0] > level;
        let subject = (bright != dark_subject) != invert;
        Luma([if subject { FOREGROUND } else { BACKGROUND }])
    });

    let opened = open(&binary, Norm::L1, OPEN_RADIUS);
    Mask::from_image(close(&opened, Norm::L2, CLOSE_RADIUS))
}

/// Arithmetic mean of all pixel values.
pub fn mean_brightness(gray: &GrayImage) -> f64 {
    let raw = gray.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| v as u64).sum();
    sum as f64 / raw.len() as f64
}

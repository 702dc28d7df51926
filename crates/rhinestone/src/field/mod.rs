//! Density field subsystem: foreground mask and density map for a working image.
//!
//! [`build_fields`] turns a (lightly blurred) grayscale image into a [`DensityFields`] pair.
//! Both rasters are read-only afterwards and shared by every placement strategy.
use image::GrayImage;
use tracing::info;

pub mod density;
pub mod edt;
pub mod mask;
pub mod raster;

pub use density::build_density;
pub use mask::detect_foreground;
pub use raster::{DensityMap, Mask, BACKGROUND, FOREGROUND};

/// Inputs of the density field builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSettings {
    /// Flip the automatic foreground polarity.
    pub invert: bool,
    /// Weight of edge proximity against brightness, `0..=1`.
    pub edge_strength: f32,
    /// Tone S-curve strength; `1.0` leaves tones unchanged.
    pub contrast: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            invert: false,
            edge_strength: 0.6,
            contrast: 1.2,
        }
    }
}

/// Foreground mask and density map of one working image.
#[derive(Debug, Clone)]
pub struct DensityFields {
    pub mask: Mask,
    pub density: DensityMap,
}

/// Run segmentation and density construction for a grayscale image.
pub fn build_fields(gray: &GrayImage, settings: &FieldSettings) -> DensityFields {
    let mask = detect_foreground(gray, settings.invert);
    let total = (gray.width() as usize * gray.height() as usize).max(1);
    info!(
        "Foreground mask: {:.1}% of {}x{}.",
        mask.foreground_count() as f64 * 100.0 / total as f64,
        gray.width(),
        gray.height()
    );
    let density = build_density(gray, &mask, settings.edge_strength, settings.contrast);
    DensityFields { mask, density }
}

//! Density map construction from brightness and edge proximity.
//!
//! Dark pixels and pixels close to an edge (image edges or the mask silhouette) get a high
//! density. The blended field is contrast-stretched over the mask so every image uses the
//! full 8-bit range, then cleared outside the mask.
use image::{GrayImage, Luma};
use imageproc::edges::canny;

use super::edt::distance_to_features;
use super::raster::{DensityMap, Mask};

/// Canny hysteresis thresholds.
const CANNY_LOW: f32 = 30.0;
const CANNY_HIGH: f32 = 120.0;

/// Exponent applied to edge proximity; below one it lifts values near edges.
const EDGE_BOOST_EXPONENT: f32 = 0.6;

/// Percentiles mapped to 0 and 1 by the contrast stretch.
const STRETCH_LOW_PERCENTILE: f32 = 2.0;
const STRETCH_HIGH_PERCENTILE: f32 = 98.0;

/// Minimum percentile spread for the stretch to apply.
const STRETCH_MIN_SPREAD: f32 = 0.01;

/// Build the density map for `gray` restricted to `mask`.
///
/// `edge_strength` in `[0, 1]` blends brightness (0) toward edge proximity (1). `contrast`
/// shapes the brightness S-curve: above 1 separates tones, below 1 flattens them.
pub fn build_density(
    gray: &GrayImage,
    mask: &Mask,
    edge_strength: f32,
    contrast: f32,
) -> DensityMap {
    let (w, h) = gray.dimensions();
    debug_assert_eq!((w, h), mask.dimensions(), "mask must match image size");
    if w == 0 || h == 0 {
        return DensityMap::from_image(GrayImage::new(w, h));
    }

    let remapped: Vec<f32> = gray
        .as_raw()
        .iter()
        .map(|&v| (contrast_curve(v as f32 / 255.0, contrast) * 255.0).clamp(0.0, 255.0))
        .collect();

    let edge = edge_proximity(&remapped, mask, w, h);

    let mut density: Vec<f32> = remapped
        .iter()
        .zip(&edge)
        .map(|(&v, &e)| {
            let brightness = ((255.0 - v) / 255.0).clamp(0.0, 1.0);
            brightness * (1.0 - edge_strength) + e * edge_strength
        })
        .collect();

    stretch_within_mask(&mut density, mask);

    let mask_raw = mask.as_image().as_raw();
    let data: Vec<u8> = density
        .iter()
        .zip(mask_raw)
        .map(|(&d, &m)| if m <= 127 { 0 } else { (d * 255.0) as u8 })
        .collect();

    DensityMap::from_image(
        GrayImage::from_raw(w, h, data).unwrap_or_else(|| GrayImage::from_pixel(w, h, Luma([0]))),
    )
}

/// S-curve contrast remap of a normalized value around the 0.5 midpoint.
pub fn contrast_curve(v: f32, contrast: f32) -> f32 {
    const MID: f32 = 0.5;
    if contrast > 1.0 {
        let gamma = 1.0 / contrast;
        if v < MID {
            MID * (v / MID).powf(gamma)
        } else {
            1.0 - (1.0 - MID) * ((1.0 - v) / (1.0 - MID)).powf(gamma)
        }
    } else if contrast < 1.0 {
        MID + (v - MID) * contrast
    } else {
        v
    }
}

/// Edge proximity in `[0, 1]`: 1 on an edge, falling toward 0 at the farthest pixel.
fn edge_proximity(remapped: &[f32], mask: &Mask, w: u32, h: u32) -> Vec<f32> {
    let tone = GrayImage::from_fn(w, h, |x, y| {
        Luma([remapped[(y * w + x) as usize] as u8])
    });
    let mut edges = canny(&tone, CANNY_LOW, CANNY_HIGH);
    let silhouette = canny(mask.as_image(), CANNY_LOW, CANNY_HIGH);
    for (e, s) in edges.pixels_mut().zip(silhouette.pixels()) {
        e.0[0] |= s.0[0];
    }

    let dist = distance_to_features(&edges);
    let max_dist = dist.iter().copied().fold(0.0f32, f32::max) + 1e-6;
    dist.into_iter()
        .map(|d| (1.0 - d / max_dist).max(0.0).powf(EDGE_BOOST_EXPONENT))
        .collect()
}

/// Rescale so the 2nd..98th percentile of in-mask values spans `[0, 1]`, clipping the rest.
fn stretch_within_mask(density: &mut [f32], mask: &Mask) {
    let mut inside: Vec<f32> = density
        .iter()
        .zip(mask.as_image().as_raw())
        .filter(|(_, &m)| m > 127)
        .map(|(&d, _)| d)
        .collect();
    if inside.is_empty() {
        return;
    }
    inside.sort_by(f32::total_cmp);

    let lo = percentile(&inside, STRETCH_LOW_PERCENTILE);
    let hi = percentile(&inside, STRETCH_HIGH_PERCENTILE);
    if hi - lo > STRETCH_MIN_SPREAD {
        let span = hi - lo;
        for d in density.iter_mut() {
            *d = ((*d - lo) / span).clamp(0.0, 1.0);
        }
    }
}

/// Percentile of sorted samples with linear interpolation between ranks.
fn percentile(sorted: &[f32], pct: f32) -> f32 {
    debug_assert!(!sorted.is_empty());
    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f32;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f32;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

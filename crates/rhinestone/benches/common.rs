use std::time::Duration;

use criterion::{Criterion, Throughput};
use rhinestone::field::{DensityMap, Mask};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Centered disk mask with a radial density falloff.
#[allow(dead_code)]
pub fn disk_fields(size: u32) -> (Mask, DensityMap) {
    let c = size as f32 / 2.0;
    let radius = c * 0.9;
    let dist = |x: u32, y: u32| ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
    let mask = Mask::from_fn(size, size, |x, y| dist(x, y) <= radius);
    let density = image::GrayImage::from_fn(size, size, |x, y| {
        let t = (1.0 - dist(x, y) / radius).clamp(0.0, 1.0);
        image::Luma([(t * 255.0) as u8])
    });
    let density = DensityMap::from_image(density).restricted_to(&mask);
    (mask, density)
}

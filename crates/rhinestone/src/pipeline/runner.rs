//! High-level runner: decode, fit, segment, place, combine.
use std::time::Instant;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use rand::Rng;
use tracing::info;

use crate::dots::combine::merge;
use crate::dots::shapes::assign_random_shapes;
use crate::dots::{Dot, ShapeSelection};
use crate::error::Result;
use crate::field::{build_fields, DensityFields};
use crate::params::PlacementParams;
use crate::pipeline::{ProcessOutput, CONTOUR_FOLLOW_MERGE_FACTOR, PRE_BLUR_SIGMA};
use crate::sampling::{ContourOutlinePlacement, DotPlacement, Method};

/// Decode `bytes` (any format `image` recognizes) and turn the picture into dots.
///
/// Only decoding can fail. An image without foreground yields an empty dot list.
pub fn process<R: Rng>(
    bytes: &[u8],
    params: &PlacementParams,
    rng: &mut R,
) -> Result<ProcessOutput> {
    let image = image::load_from_memory(bytes)?;
    info!("Image decoded: {}x{}.", image.width(), image.height());
    Ok(process_image(&image, params, rng))
}

/// Same as [`process`] for an already decoded image.
///
/// Parameters are clamped into their documented ranges first.
pub fn process_image<R: Rng>(
    image: &DynamicImage,
    params: &PlacementParams,
    rng: &mut R,
) -> ProcessOutput {
    let started = Instant::now();
    let params = params.sanitized();

    let (width, height) = fit_to_canvas(
        image.dimensions(),
        params.canvas_width,
        params.canvas_height,
    );
    let gray = working_gray(image, width, height);
    let fields = build_fields(&gray, &params.field_settings());
    info!("Density map built in {:?}.", started.elapsed());

    let dots = place_dots(&fields, &params, rng);
    info!(
        "Total processing: {} dots in {:?}.",
        dots.len(),
        started.elapsed()
    );

    ProcessOutput {
        dots,
        working_width: width,
        working_height: height,
    }
}

/// Placement stage on prepared fields: primary method, optional outline merge, shapes.
pub fn place_dots(
    fields: &DensityFields,
    params: &PlacementParams,
    rng: &mut dyn Rng,
) -> Vec<Dot> {
    let started = Instant::now();
    let mut dots = params
        .method
        .place(&fields.mask, &fields.density, params, rng);
    info!(
        "Dot placement ({}): {} dots in {:?}.",
        params.method,
        dots.len(),
        started.elapsed()
    );

    if params.use_contour_follow && params.method != Method::Contour {
        let started = Instant::now();
        let outline =
            ContourOutlinePlacement::default().place(&fields.mask, &fields.density, params, rng);
        dots = merge(
            &outline,
            &dots,
            params.min_spacing * CONTOUR_FOLLOW_MERGE_FACTOR,
        );
        info!(
            "Contour merge: {} total dots in {:?}.",
            dots.len(),
            started.elapsed()
        );
    }

    if params.dot_shape == ShapeSelection::Random {
        dots = assign_random_shapes(&dots, rng);
    }
    dots
}

/// Largest size with the original aspect ratio that fits the canvas; each side at least 1 px.
pub fn fit_to_canvas(original: (u32, u32), canvas_width: u32, canvas_height: u32) -> (u32, u32) {
    let (ow, oh) = (original.0.max(1) as f64, original.1.max(1) as f64);
    let scale = (canvas_width as f64 / ow).min(canvas_height as f64 / oh);
    let w = ((ow * scale) as u32).max(1);
    let h = ((oh * scale) as u32).max(1);
    (w, h)
}

/// Resize to the working size, convert to grayscale and smooth.
fn working_gray(image: &DynamicImage, width: u32, height: u32) -> GrayImage {
    let gray = if image.dimensions() == (width, height) {
        luma_bt601(&image.to_rgb8())
    } else {
        luma_bt601(
            &image
                .resize_exact(width, height, FilterType::Triangle)
                .to_rgb8(),
        )
    };
    gaussian_blur_f32(&gray, PRE_BLUR_SIGMA)
}

/// Grayscale with BT.601 weights (`0.299 R + 0.587 G + 0.114 B`).
///
/// `DynamicImage::to_luma8` uses Rec.709 weights, which shifts the Otsu split on colored logos.
fn luma_bt601(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let v = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

use image::imageops::FilterType;
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rhinestone::pipeline::runner::fit_to_canvas;
use rhinestone::prelude::*;
use rhinestone::sampling::contour_outline::{OutlineTrace, OUTLINE_OVERLAP_FACTOR};
use rhinestone_examples::{dark_square, init_tracing, render_dots_to_png, ring_logo, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(3);

    // Full pipeline on a square logo.
    let square = DynamicImage::ImageLuma8(dark_square(300, 60));
    let params = PlacementParams::default()
        .with_method(Method::Contour)
        .with_min_spacing(10.0)
        .with_dot_radius(3.0)
        .with_canvas(300, 300);
    let out = process_image(&square, &params, &mut rng);
    render_dots_to_png(
        &out.dots,
        out.working_width,
        out.working_height,
        &RenderConfig::default(),
        "contour-square-logo.png",
    )?;

    // Outline preview on a ring logo, calling the field builder and strategy directly.
    let ring = DynamicImage::ImageLuma8(ring_logo(640));
    let (w, h) = fit_to_canvas((640, 640), 320, 320);
    let gray = ring.resize_exact(w, h, FilterType::Triangle).to_luma8();
    let fields = build_fields(&gray, &params.field_settings());
    let placement = ContourOutlinePlacement::default();
    let OutlineTrace { dots, rings } = placement.trace(&fields.mask, &fields.density, &params);
    tracing::info!("Ring logo: {} raw outline dots over {} rings.", dots.len(), rings);

    let spaced = remove_overlaps(&dots, params.min_spacing * OUTLINE_OVERLAP_FACTOR);
    let tilted = rotate(&spaced, 15.0, w, h);
    render_dots_to_png(
        &tilted,
        w,
        h,
        &RenderConfig::default().with_dot_color([255, 196, 64]),
        "contour-ring-logo.png",
    )
}

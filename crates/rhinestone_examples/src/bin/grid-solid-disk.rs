use image::DynamicImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rhinestone::prelude::*;
use rhinestone_examples::{dark_disk, init_tracing, render_dots_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Black disk over a third of a 200px frame, uniform 4px dots on a 10px hex lattice.
    let image = DynamicImage::ImageLuma8(dark_disk(200, 65.0));
    let params = PlacementParams::default()
        .with_method(Method::Grid)
        .with_min_spacing(10.0)
        .with_dot_radius(4.0)
        .with_sizing_mode(SizingMode::Uniform)
        .with_canvas(200, 200);

    let mut rng = StdRng::seed_from_u64(42);
    let out = process_image(&image, &params, &mut rng);

    render_dots_to_png(
        &out.dots,
        out.working_width,
        out.working_height,
        &RenderConfig::default().with_scale(3.0),
        "grid-solid-disk.png",
    )
}

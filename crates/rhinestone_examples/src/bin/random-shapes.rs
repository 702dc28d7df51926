use image::DynamicImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rhinestone::prelude::*;
use rhinestone_examples::{dark_disk, init_tracing, render_dots_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Grid fill with outline dots on top, each dot drawn with a random shape.
    let image = DynamicImage::ImageLuma8(dark_disk(240, 80.0));
    let params = PlacementParams::default()
        .with_method(Method::Grid)
        .with_min_spacing(14.0)
        .with_dot_radius(5.0)
        .with_contour_follow(true)
        .with_dot_shape(ShapeSelection::Random)
        .with_canvas(240, 240);

    let mut rng = StdRng::seed_from_u64(99);
    let out = process_image(&image, &params, &mut rng);

    for shape in DotShape::ALL {
        let count = out.dots.iter().filter(|d| d.shape == Some(shape)).count();
        tracing::info!("{}: {} dots.", shape, count);
    }

    render_dots_to_png(
        &out.dots,
        out.working_width,
        out.working_height,
        &RenderConfig::default().with_scale(3.0),
        "random-shapes.png",
    )
}

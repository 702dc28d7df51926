use image::DynamicImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rhinestone::prelude::*;
use rhinestone_examples::{init_tracing, radial_gradient_disk, render_dots_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Dark center, lighter rim: variable sizing turns tone into dot size and spacing.
    let image = DynamicImage::ImageLuma8(radial_gradient_disk(400, 170.0));
    let mut rng = StdRng::seed_from_u64(7);

    for (edge_strength, name) in [(0.0, "tone-only"), (0.6, "tone-and-edges")] {
        let params = PlacementParams::default()
            .with_method(Method::Poisson)
            .with_min_spacing(8.0)
            .with_dot_radius(3.0)
            .with_density(1.5)
            .with_edge_strength(edge_strength)
            .with_sizing_mode(SizingMode::Variable)
            .with_canvas(400, 400);
        let out = process_image(&image, &params, &mut rng);

        render_dots_to_png(
            &out.dots,
            out.working_width,
            out.working_height,
            &RenderConfig::default(),
            format!("poisson-gradient-disk-{name}.png"),
        )?;
    }
    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rhinestone::prelude::*;
use rhinestone_examples::{init_tracing, render_dots_to_png, RenderConfig};

/// Convert an image file into a dot pattern preview.
#[derive(Parser, Debug)]
#[command(name = "process-file")]
#[command(about, long_about = None)]
struct Args {
    /// Input image (PNG or JPEG).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PNG preview.
    #[arg(value_name = "OUTPUT", default_value = "dots.png")]
    output: PathBuf,

    /// poisson | grid | contour
    #[arg(long, default_value = "poisson")]
    method: String,

    /// circle | diamond | star | hexagon | random
    #[arg(long, default_value = "circle")]
    shape: String,

    /// uniform | variable
    #[arg(long, default_value = "uniform")]
    sizing: String,

    #[arg(long, default_value_t = 4.0)]
    radius: f32,

    #[arg(long, default_value_t = 10.0)]
    spacing: f32,

    #[arg(long, default_value_t = 1.0)]
    density: f32,

    #[arg(long, default_value_t = 0.0)]
    rotation: f32,

    #[arg(long, default_value_t = 800)]
    canvas: u32,

    /// Overlay outline dots on the primary placement.
    #[arg(long)]
    contour_follow: bool,

    /// Treat the bright part of the image as background.
    #[arg(long)]
    invert: bool,

    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let params = PlacementParams::default()
        .with_method(Method::parse_lenient(&args.method))
        .with_dot_shape(ShapeSelection::parse_lenient(&args.shape))
        .with_sizing_mode(SizingMode::parse_lenient(&args.sizing))
        .with_dot_radius(args.radius)
        .with_min_spacing(args.spacing)
        .with_density(args.density)
        .with_rotation(args.rotation)
        .with_canvas(args.canvas, args.canvas)
        .with_contour_follow(args.contour_follow)
        .with_invert(args.invert);
    if let Err(e) = params.validate() {
        tracing::warn!("{}; values will be clamped.", e);
    }

    let bytes = std::fs::read(&args.input)?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let out = process(&bytes, &params, &mut rng)?;

    render_dots_to_png(
        &out.dots,
        out.working_width,
        out.working_height,
        &RenderConfig::default(),
        &args.output,
    )
}

#![forbid(unsafe_code)]

mod rendering;
mod synthetic;

pub use rendering::{init_tracing, render_dots_to_png, RenderConfig};
pub use synthetic::{dark_disk, dark_square, radial_gradient_disk, ring_logo};

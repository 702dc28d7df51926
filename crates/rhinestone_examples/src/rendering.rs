use std::f32::consts::{FRAC_PI_2, PI};
use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use rhinestone::dots::{Dot, DotShape};
use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber that honors `RUST_LOG` (default: `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Output settings for dot previews.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output pixels per working-image pixel.
    pub scale: f32,
    pub background: [u8; 3],
    /// Fill for dots without their own color.
    pub dot_color: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: [24, 24, 28],
            dot_color: [236, 236, 244],
        }
    }
}

impl RenderConfig {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_dot_color(mut self, dot_color: [u8; 3]) -> Self {
        self.dot_color = dot_color;
        self
    }
}

/// Rasterize dots over a `width`×`height` working area and save as PNG.
pub fn render_dots_to_png(
    dots: &[Dot],
    width: u32,
    height: u32,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let scale = config.scale.max(0.1);
    let out_w = ((width as f32 * scale).round() as u32).max(1);
    let out_h = ((height as f32 * scale).round() as u32).max(1);
    let mut img = RgbImage::from_pixel(out_w, out_h, Rgb(config.background));

    for dot in dots {
        let color = dot
            .color
            .as_deref()
            .and_then(parse_hex)
            .unwrap_or(config.dot_color);
        let shape = ShapeMask::new(dot.shape.unwrap_or_default(), dot.r * scale);
        stamp(&mut img, dot.position() * scale, &shape, Rgb(color));
    }

    img.save(path.as_ref())?;
    tracing::info!("Wrote {} dots to {}.", dots.len(), path.as_ref().display());
    Ok(())
}

/// Point-in-shape test centered on the origin.
struct ShapeMask {
    shape: DotShape,
    radius: f32,
    star: Vec<Vec2>,
}

impl ShapeMask {
    fn new(shape: DotShape, radius: f32) -> Self {
        let star = if shape == DotShape::Star {
            (0..10)
                .map(|i| {
                    let r = if i % 2 == 0 { radius } else { radius * 0.45 };
                    let a = -FRAC_PI_2 + i as f32 * PI / 5.0;
                    Vec2::from_angle(a) * r
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            shape,
            radius,
            star,
        }
    }

    fn contains(&self, d: Vec2) -> bool {
        let r = self.radius;
        match self.shape {
            DotShape::Circle => d.length_squared() <= r * r,
            DotShape::Diamond => d.x.abs() + d.y.abs() <= r,
            DotShape::Hexagon => {
                let (x, y) = (d.x.abs(), d.y.abs());
                let s3 = 3.0_f32.sqrt();
                y <= r * s3 * 0.5 && s3 * x + y <= s3 * r
            }
            DotShape::Star => point_in_polygon(d, &self.star),
        }
    }
}

fn stamp(img: &mut RgbImage, center: Vec2, shape: &ShapeMask, color: Rgb<u8>) {
    let r = shape.radius.max(0.5);
    let x0 = (center.x - r).floor().max(0.0) as u32;
    let y0 = (center.y - r).floor().max(0.0) as u32;
    let x1 = ((center.x + r).ceil().max(0.0) as u32).min(img.width().saturating_sub(1));
    let y1 = ((center.y + r).ceil().max(0.0) as u32).min(img.height().saturating_sub(1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
            if shape.contains(d) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

fn point_in_polygon(p: Vec2, poly: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = poly.len().wrapping_sub(1);
    for (i, a) in poly.iter().enumerate() {
        let b = poly[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn parse_hex(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

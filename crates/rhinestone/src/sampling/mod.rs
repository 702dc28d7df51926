//! Dot placement strategies over a foreground mask and density map.
//!
//! This module defines the [`DotPlacement`] trait, the [`Method`] enum that selects a
//! strategy at runtime, and the rules shared by every strategy: local spacing and dot size
//! derived from density.
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dots::{quantize, Dot};
use crate::error::Error;
use crate::field::{DensityMap, Mask};
use crate::params::PlacementParams;

pub mod contour_outline;
pub mod hex_grid;
pub mod occupancy;
pub mod poisson_disk;

pub use contour_outline::ContourOutlinePlacement;
pub use hex_grid::HexGridPlacement;
pub use poisson_disk::PoissonDiskPlacement;

/// Trait for dot placement.
///
/// Implementations never emit a dot whose rounded position is background in `mask`.
pub trait DotPlacement: Send + Sync {
    fn place(
        &self,
        mask: &Mask,
        density: &DensityMap,
        params: &PlacementParams,
        rng: &mut dyn Rng,
    ) -> Vec<Dot>;
}

/// Placement algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Method {
    /// Density-aware Poisson-disk sampling.
    #[default]
    Poisson,
    /// Hex-offset lattice.
    Grid,
    /// Concentric outline rings.
    Contour,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Poisson => "poisson",
            Method::Grid => "grid",
            Method::Contour => "contour",
        }
    }

    /// Parse a method name, falling back to [`Method::Poisson`] for unknown input.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|e| {
            warn!("{}; using poisson.", e);
            Method::default()
        })
    }

    /// Run the selected strategy with its default budget.
    pub fn place(
        self,
        mask: &Mask,
        density: &DensityMap,
        params: &PlacementParams,
        rng: &mut dyn Rng,
    ) -> Vec<Dot> {
        match self {
            Method::Poisson => PoissonDiskPlacement::default().place(mask, density, params, rng),
            Method::Grid => HexGridPlacement.place(mask, density, params, rng),
            Method::Contour => {
                ContourOutlinePlacement::default().place(mask, density, params, rng)
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poisson" => Ok(Method::Poisson),
            "grid" => Ok(Method::Grid),
            "contour" => Ok(Method::Contour),
            other => Err(Error::InvalidConfig(format!(
                "unknown placement method '{other}'"
            ))),
        }
    }
}

/// How dot radii respond to density.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SizingMode {
    /// Every dot uses the base radius.
    #[default]
    Uniform,
    /// Dark regions get larger dots, highlights smaller ones.
    Variable,
}

impl SizingMode {
    /// Parse a sizing mode, falling back to [`SizingMode::Uniform`] for unknown input.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => SizingMode::Uniform,
            "variable" => SizingMode::Variable,
            other => {
                warn!("unknown sizing mode '{}'; using uniform.", other);
                SizingMode::default()
            }
        }
    }
}

/// Self-imposed work limits. Reaching one ends placement early with a valid, sparser result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementBudget {
    /// Stop once this many dots exist.
    pub max_dots: usize,
    /// Stop once this much wall-clock time has elapsed.
    pub time_limit: Duration,
}

impl PlacementBudget {
    pub const fn new(max_dots: usize, time_limit: Duration) -> Self {
        Self {
            max_dots,
            time_limit,
        }
    }

    /// Returns `true` once `count` dots or the time limit since `started` is reached.
    #[inline]
    pub fn exhausted(&self, count: usize, started: Instant) -> bool {
        count >= self.max_dots || started.elapsed() > self.time_limit
    }
}

/// Radius and spacing rules derived from the base parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotSizing {
    pub base_radius: f32,
    pub density_multiplier: f32,
    pub mode: SizingMode,
}

impl DotSizing {
    pub fn from_params(params: &PlacementParams) -> Self {
        Self {
            base_radius: params.dot_radius,
            density_multiplier: params.density,
            mode: params.sizing_mode,
        }
    }

    /// Dot radius for a local density in `[0, 1]`, quantized to 0.01.
    ///
    /// Variable sizing spans `0.2×` (highlights) to at most `2.5×` (shadows) the base radius
    /// and never drops below `0.15×`.
    pub fn radius(&self, density: f32) -> f32 {
        let base = self.base_radius;
        match self.mode {
            SizingMode::Uniform => quantize(base),
            SizingMode::Variable => {
                const MIN_FACTOR: f32 = 0.2;
                let max_factor = (1.0 + self.density_multiplier * 0.8).min(2.5);
                let factor = MIN_FACTOR + density * (max_factor - MIN_FACTOR);
                quantize((base * 0.15).max(base * factor))
            }
        }
    }
}

/// Local spacing for a density in `[0, 1]`: denser regions pack tighter.
///
/// The factor on `base_spacing` is clamped to `[0.5, 2.5]`.
#[inline]
pub fn local_spacing(base_spacing: f32, density: f32, density_multiplier: f32) -> f32 {
    let factor = 2.0 - density * 1.2 * density_multiplier.min(2.0);
    base_spacing * factor.clamp(0.5, 2.5)
}

/// Returns `true` when the rasters line up and the base lengths are usable.
pub(crate) fn inputs_usable(mask: &Mask, density: &DensityMap, params: &PlacementParams) -> bool {
    if mask.dimensions() != density.dimensions() {
        warn!(
            "Mask is {:?} but density map is {:?}; placing no dots.",
            mask.dimensions(),
            density.dimensions()
        );
        return false;
    }
    is_positive(params.min_spacing) && is_positive(params.dot_radius)
}

/// Returns `true` if `v` is usable as a length.
#[inline]
pub(crate) fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    unit_from_bits(rng.next_u32())
}

/// Map the top 24 bits of `bits` onto `[0, 1)`; every result is exact in `f32`.
#[inline]
fn unit_from_bits(bits: u32) -> f32 {
    (bits >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Uniform random index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    ((rng.next_u64() % len as u64) as usize).min(len - 1)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use glam::Vec2;

    use super::*;

    /// Filled disk centered in a `size`×`size` mask.
    pub fn disk(size: u32, radius: f32) -> Mask {
        let c = size as f32 / 2.0;
        Mask::from_fn(size, size, |x, y| {
            Vec2::new(x as f32, y as f32).distance(Vec2::splat(c)) <= radius
        })
    }

    /// Ring between `inner` and `outer` centered in a `size`×`size` mask.
    pub fn annulus(size: u32, inner: f32, outer: f32) -> Mask {
        let c = size as f32 / 2.0;
        Mask::from_fn(size, size, |x, y| {
            let d = Vec2::new(x as f32, y as f32).distance(Vec2::splat(c));
            d >= inner && d <= outer
        })
    }

    /// Alternating `cell`-pixel squares.
    pub fn checkerboard(size: u32, cell: u32) -> Mask {
        Mask::from_fn(size, size, |x, y| (x / cell + y / cell) % 2 == 0)
    }

    /// Axis-aligned square `[lo, hi)` inside a `size`×`size` mask.
    pub fn square(size: u32, lo: u32, hi: u32) -> Mask {
        Mask::from_fn(size, size, |x, y| (lo..hi).contains(&x) && (lo..hi).contains(&y))
    }

    pub fn uniform_density(mask: &Mask, value: u8) -> DensityMap {
        DensityMap::uniform(mask.width(), mask.height(), value).restricted_to(mask)
    }

    pub fn assert_inside(mask: &Mask, dots: &[Dot]) {
        for dot in dots {
            assert!(mask.contains(dot.position()), "dot outside mask: {dot:?}");
        }
    }

    pub fn min_pairwise(dots: &[Dot]) -> f32 {
        let mut min = f32::MAX;
        for (i, a) in dots.iter().enumerate() {
            for b in &dots[i + 1..] {
                min = min.min(a.position().distance(b.position()));
            }
        }
        min
    }
}

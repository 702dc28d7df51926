//! Hex-offset lattice dot placement.
use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::dots::combine::rotate;
use crate::dots::{quantize, Dot};
use crate::field::{DensityMap, Mask};
use crate::params::PlacementParams;
use crate::sampling::{inputs_usable, DotPlacement, DotSizing};

/// Deterministic lattice: rows `min_spacing` apart, alternate rows shifted by half a spacing.
///
/// Radii follow density but spacing is never re-checked, so variable sizing at high density
/// can make neighbors overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexGridPlacement;

impl HexGridPlacement {
    /// Lattice points covering a `width`×`height` image, row by row.
    pub fn lattice(width: u32, height: u32, spacing: f32) -> impl Iterator<Item = Vec2> {
        let (w, h) = (width as f32, height as f32);
        let rows = row_count(h, spacing);
        (0..rows).flat_map(move |row| {
            let y = spacing * 0.5 + row as f32 * spacing;
            let x0 = if row % 2 == 0 { spacing } else { spacing * 0.5 };
            let cols = row_count(w - x0 + spacing * 0.5, spacing);
            (0..cols).map(move |col| Vec2::new(x0 + col as f32 * spacing, y))
        })
    }
}

/// Number of points `s/2 + i·s` that stay below `extent`.
#[inline]
fn row_count(extent: f32, spacing: f32) -> usize {
    let n = ((extent - spacing * 0.5) / spacing).ceil();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

impl DotPlacement for HexGridPlacement {
    fn place(
        &self,
        mask: &Mask,
        density: &DensityMap,
        params: &PlacementParams,
        _rng: &mut dyn Rng,
    ) -> Vec<Dot> {
        if !inputs_usable(mask, density, params) {
            return Vec::new();
        }
        let sizing = DotSizing::from_params(params);
        let (w, h) = mask.dimensions();

        let dots: Vec<Dot> = Self::lattice(w, h, params.min_spacing)
            .map(|p| Vec2::new(quantize(p.x), quantize(p.y)))
            .filter(|p| mask.contains(*p))
            .map(|p| Dot::at(p, sizing.radius(density.sample(p))))
            .collect();
        debug!("Grid placement: {} dots.", dots.len());

        rotate(&dots, params.rotation, w, h)
    }
}

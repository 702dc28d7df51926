//! Concentric outline placement: dots walked along mask contours, ring by ring.
//!
//! Each ring traces every border of the current mask (outer borders and hole borders), then
//! the mask is eroded and traced again. The result is the rhinestone-outline look used for
//! apparel patterns.
use std::time::{Duration, Instant};

use glam::Vec2;
use imageproc::contours::find_contours;
use rand::Rng;
use tracing::debug;

use crate::dots::combine::{remove_overlaps, rotate};
use crate::dots::Dot;
use crate::field::{DensityMap, Mask};
use crate::params::PlacementParams;
use crate::sampling::{inputs_usable, DotPlacement, DotSizing, PlacementBudget};

/// Rings stop once fewer foreground pixels than this remain.
const MIN_RING_FOREGROUND: usize = 10;
/// Contours enclosing less area than this (px²) are skipped.
const MIN_CONTOUR_AREA: f32 = 15.0;
/// Contours shorter than this fraction of the spacing are skipped.
const MIN_PERIMETER_FACTOR: f32 = 0.8;
/// Erosion depth between rings as a fraction of the spacing.
const RING_STEP_FACTOR: f32 = 0.6;
/// Final overlap removal distance as a fraction of the spacing.
pub const OUTLINE_OVERLAP_FACTOR: f32 = 0.55;

/// Dots placed along concentric contours of the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContourOutlinePlacement {
    pub budget: PlacementBudget,
    pub max_rings: usize,
}

/// Raw outline walk before overlap removal and rotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineTrace {
    pub dots: Vec<Dot>,
    /// Number of erosion rings that were traced.
    pub rings: usize,
}

impl ContourOutlinePlacement {
    pub const DEFAULT_BUDGET: PlacementBudget =
        PlacementBudget::new(15_000, Duration::from_secs(20));
    pub const DEFAULT_MAX_RINGS: usize = 80;

    pub fn new(budget: PlacementBudget) -> Self {
        Self {
            budget,
            max_rings: Self::DEFAULT_MAX_RINGS,
        }
    }

    pub fn with_max_rings(mut self, max_rings: usize) -> Self {
        self.max_rings = max_rings;
        self
    }

    /// Erosion passes between two rings for a given spacing.
    pub fn ring_step(spacing: f32) -> u32 {
        (spacing * RING_STEP_FACTOR).round().max(2.0) as u32
    }

    /// Walk every ring and collect dots in emission order.
    pub fn trace(&self, mask: &Mask, density: &DensityMap, params: &PlacementParams) -> OutlineTrace {
        let mut trace = OutlineTrace::default();
        if !inputs_usable(mask, density, params) {
            return trace;
        }

        let spacing = params.min_spacing;
        let sizing = DotSizing::from_params(params);
        let step = Self::ring_step(spacing);
        let max_dots = self.budget.max_dots;
        let started = Instant::now();
        let mut current = mask.clone();

        while trace.rings < self.max_rings {
            if self.budget.exhausted(trace.dots.len(), started) {
                debug!(
                    "Outline placement stopped at budget ({} dots, {} rings).",
                    trace.dots.len(),
                    trace.rings
                );
                break;
            }
            if current.foreground_count() < MIN_RING_FOREGROUND {
                break;
            }

            for contour in find_contours::<u32>(current.as_image()) {
                if trace.dots.len() >= max_dots {
                    break;
                }
                let points: Vec<Vec2> = contour
                    .points
                    .iter()
                    .map(|p| Vec2::new(p.x as f32, p.y as f32))
                    .collect();
                if polygon_area(&points) < MIN_CONTOUR_AREA
                    || closed_perimeter(&points) < spacing * MIN_PERIMETER_FACTOR
                {
                    continue;
                }
                for p in walk(&points, spacing) {
                    if trace.dots.len() >= max_dots {
                        break;
                    }
                    trace
                        .dots
                        .push(Dot::at(p, sizing.radius(density.sample(p))));
                }
            }

            current = current.eroded(step);
            trace.rings += 1;
        }

        debug!(
            "Outline trace: {} dots over {} rings in {:?}.",
            trace.dots.len(),
            trace.rings,
            started.elapsed()
        );
        trace
    }
}

impl Default for ContourOutlinePlacement {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUDGET)
    }
}

impl DotPlacement for ContourOutlinePlacement {
    fn place(
        &self,
        mask: &Mask,
        density: &DensityMap,
        params: &PlacementParams,
        _rng: &mut dyn Rng,
    ) -> Vec<Dot> {
        let trace = self.trace(mask, density, params);
        let dots = remove_overlaps(&trace.dots, params.min_spacing * OUTLINE_OVERLAP_FACTOR);
        let (w, h) = mask.dimensions();
        rotate(&dots, params.rotation, w, h)
    }
}

/// Points along a closed polyline, one each time the walked length reaches `spacing`.
///
/// The accumulator resets on emission, so leftover length past `spacing` is dropped and
/// dots always sit on contour vertices.
fn walk(points: &[Vec2], spacing: f32) -> impl Iterator<Item = Vec2> + '_ {
    let n = points.len();
    let mut accum = 0.0;
    (0..n).filter_map(move |i| {
        let p0 = points[i];
        let p1 = points[(i + 1) % n];
        accum += p0.distance(p1);
        if accum >= spacing {
            accum = 0.0;
            Some(p1)
        } else {
            None
        }
    })
}

/// Absolute shoelace area of a closed polygon.
fn polygon_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum();
    twice.abs() * 0.5
}

/// Length of a closed polyline including the closing segment.
fn closed_perimeter(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| points[i].distance(points[(i + 1) % n])).sum()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::fixtures::{
        annulus, assert_inside, disk, min_pairwise, square, uniform_density,
    };

    fn params(spacing: f32) -> PlacementParams {
        PlacementParams::default()
            .with_min_spacing(spacing)
            .with_dot_radius(3.0)
    }

    fn place(placement: &ContourOutlinePlacement, mask: &Mask, params: &PlacementParams) -> Vec<Dot> {
        let density = uniform_density(mask, 200);
        let mut rng = StdRng::seed_from_u64(0);
        placement.place(mask, &density, params, &mut rng)
    }

    #[test]
    fn shoelace_area_and_perimeter_of_square() {
        let sq = [
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ];
        assert_eq!(polygon_area(&sq), 16.0);
        assert_eq!(closed_perimeter(&sq), 16.0);
        assert_eq!(polygon_area(&sq[..2]), 0.0);
    }

    #[test]
    fn walk_emits_at_vertices_and_resets() {
        let line: Vec<Vec2> = (0..10).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let emitted: Vec<Vec2> = walk(&line, 3.0).collect();
        // Closing segment from x=9 back to x=0 is 9 long.
        assert_eq!(
            emitted,
            vec![
                Vec2::new(3.0, 0.0),
                Vec2::new(6.0, 0.0),
                Vec2::new(9.0, 0.0),
                Vec2::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn ring_step_has_a_floor_of_two() {
        assert_eq!(ContourOutlinePlacement::ring_step(10.0), 6);
        assert_eq!(ContourOutlinePlacement::ring_step(3.0), 2);
        assert_eq!(ContourOutlinePlacement::ring_step(30.0), 18);
    }

    #[test]
    fn square_logo_forms_bounded_spaced_rings() {
        let mask = square(300, 50, 250);
        let density = uniform_density(&mask, 200);
        let placement = ContourOutlinePlacement::default();

        let trace = placement.trace(&mask, &density, &params(10.0));
        assert!(trace.rings > 1);
        assert!(trace.rings <= 80);

        let dots = place(&placement, &mask, &params(10.0));
        assert!(!dots.is_empty());
        assert!(min_pairwise(&dots) >= 5.5 * (1.0 - 1e-4));
        assert_inside(&mask, &dots);
    }

    #[test]
    fn rings_follow_hole_borders() {
        let mask = annulus(160, 30.0, 70.0);
        let dots = place(&ContourOutlinePlacement::default(), &mask, &params(6.0));
        assert_inside(&mask, &dots);
        let center = Vec2::splat(80.0);
        assert!(dots.iter().any(|d| d.position().distance(center) < 35.0));
        assert!(dots.iter().any(|d| d.position().distance(center) > 65.0));
    }

    #[test]
    fn ring_limit_is_respected() {
        let mask = disk(200, 90.0);
        let density = uniform_density(&mask, 200);
        let placement = ContourOutlinePlacement::default().with_max_rings(2);
        let trace = placement.trace(&mask, &density, &params(8.0));
        assert_eq!(trace.rings, 2);
    }

    #[test]
    fn dot_cap_is_strict_and_monotone() {
        let mask = disk(200, 90.0);
        let mut previous = 0;
        for cap in [0, 5, 40, 300, 15_000] {
            let placement =
                ContourOutlinePlacement::new(PlacementBudget::new(cap, Duration::from_secs(20)));
            let dots = place(&placement, &mask, &params(8.0));
            assert!(dots.len() <= cap);
            assert!(dots.len() >= previous);
            previous = dots.len();
        }
    }

    #[test]
    fn tiny_shapes_yield_no_dots() {
        let mask = square(40, 10, 13);
        assert!(place(&ContourOutlinePlacement::default(), &mask, &params(10.0)).is_empty());
    }
}

//! Uniform-grid spatial index for "is any point closer than r?" queries.
use std::f64::consts::SQRT_2;

use glam::Vec2;

/// Marks an empty cell or the end of a cell chain.
const NONE: u32 = u32::MAX;

/// Upper bound on allocated cells; coarser cells are used beyond it.
const MAX_CELLS: usize = 1 << 22;

/// Uniform grid over a rectangle with cell side `spacing / √2`.
///
/// Any two points closer than `spacing` land in the same or a neighboring cell, so a query
/// scans the 5×5 block around the query cell (wider when the radius exceeds two cells).
/// Points outside the rectangle are clamped into the border cells, which keeps queries exact
/// for any input.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cell_size: f32,
    origin: Vec2,
    cols: usize,
    rows: usize,
    /// First point index per cell.
    heads: Vec<u32>,
    /// Next point index in the same cell.
    next: Vec<u32>,
    points: Vec<Vec2>,
}

impl OccupancyGrid {
    /// Create a grid covering `origin..origin + extent` tuned for `spacing`.
    pub fn new(spacing: f32, origin: Vec2, extent: Vec2) -> Self {
        let mut cell_size = if spacing.is_finite() && spacing > 0.0 {
            spacing as f64 / SQRT_2
        } else {
            1.0
        };
        let (ex, ey) = (
            sanitize_extent(extent.x) as f64,
            sanitize_extent(extent.y) as f64,
        );

        // Sized in f64 so tiny cells cannot overflow the count.
        let cells = cells_along(ex, cell_size) * cells_along(ey, cell_size);
        if cells > MAX_CELLS as f64 {
            cell_size *= (cells / MAX_CELLS as f64).sqrt();
        }
        let cols = cells_along(ex, cell_size).min(MAX_CELLS as f64) as usize;
        let rows = cells_along(ey, cell_size).min(MAX_CELLS as f64) as usize;

        Self {
            cell_size: cell_size as f32,
            origin,
            cols,
            rows,
            heads: vec![NONE; cols * rows],
            next: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Create a grid covering the bounding box of `points` (nothing is inserted).
    pub fn covering(spacing: f32, points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for p in points {
            if p.is_finite() {
                min = min.min(p);
                max = max.max(p);
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return Self::new(spacing, Vec2::ZERO, Vec2::ZERO);
        }
        Self::new(spacing, min, max - min)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let rel = (p - self.origin) / self.cell_size;
        let cx = clamp_cell(rel.x, self.cols);
        let cy = clamp_cell(rel.y, self.rows);
        (cx, cy)
    }

    /// Record a point.
    pub fn insert(&mut self, p: Vec2) {
        let (cx, cy) = self.cell_of(p);
        let cell = cy * self.cols + cx;
        let idx = self.points.len() as u32;
        self.points.push(p);
        self.next.push(self.heads[cell]);
        self.heads[cell] = idx;
    }

    /// Returns `true` if a stored point lies strictly closer than `radius` to `p`.
    pub fn has_neighbor_within(&self, p: Vec2, radius: f32) -> bool {
        if radius.is_nan() || radius <= 0.0 || self.points.is_empty() {
            return false;
        }
        let r2 = radius * radius;
        let reach = ((radius / self.cell_size).ceil() as usize).max(2);
        let (cx, cy) = self.cell_of(p);

        let x0 = cx.saturating_sub(reach);
        let x1 = cx.saturating_add(reach).saturating_add(1).min(self.cols);
        let y0 = cy.saturating_sub(reach);
        let y1 = cy.saturating_add(reach).saturating_add(1).min(self.rows);

        for gy in y0..y1 {
            for gx in x0..x1 {
                let mut idx = self.heads[gy * self.cols + gx];
                while idx != NONE {
                    let q = self.points[idx as usize];
                    if p.distance_squared(q) < r2 {
                        return true;
                    }
                    idx = self.next[idx as usize];
                }
            }
        }
        false
    }
}

/// Cells needed to cover `extent` with one spare for the far edge.
#[inline]
fn cells_along(extent: f64, cell_size: f64) -> f64 {
    (extent / cell_size).ceil() + 1.0
}

#[inline]
fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

#[inline]
fn clamp_cell(v: f32, len: usize) -> usize {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        (v.floor() as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::rand01;

    #[test]
    fn grid_dimensions_follow_cell_size() {
        let grid = OccupancyGrid::new(2.0, Vec2::ZERO, Vec2::new(10.0, 4.0));
        let cell = 2.0 / SQRT_2 as f32;
        assert!((grid.cell_size() - cell).abs() < 1e-6);
        assert_eq!(grid.cols, (10.0 / cell).ceil() as usize + 1);
        assert_eq!(grid.rows, (4.0 / cell).ceil() as usize + 1);
    }

    #[test]
    fn detects_close_neighbors_only() {
        let mut grid = OccupancyGrid::new(1.0, Vec2::ZERO, Vec2::new(4.0, 4.0));
        grid.insert(Vec2::new(2.0, 2.0));

        assert!(grid.has_neighbor_within(Vec2::new(2.5, 2.0), 1.0));
        assert!(!grid.has_neighbor_within(Vec2::new(3.5, 3.5), 1.0));
        // Strictly closer than the radius.
        assert!(!grid.has_neighbor_within(Vec2::new(3.0, 2.0), 1.0));
        assert!(!grid.has_neighbor_within(Vec2::new(2.5, 2.0), 0.0));
    }

    #[test]
    fn wide_radius_scans_beyond_two_cells() {
        let mut grid = OccupancyGrid::new(1.0, Vec2::ZERO, Vec2::new(20.0, 20.0));
        grid.insert(Vec2::new(1.0, 1.0));
        assert!(grid.has_neighbor_within(Vec2::new(6.0, 1.0), 5.5));
        assert!(!grid.has_neighbor_within(Vec2::new(6.0, 1.0), 4.5));
    }

    #[test]
    fn points_outside_bounds_are_still_found() {
        let mut grid = OccupancyGrid::new(2.0, Vec2::ZERO, Vec2::new(10.0, 10.0));
        grid.insert(Vec2::new(-3.0, -3.0));
        assert!(grid.has_neighbor_within(Vec2::new(-2.0, -3.0), 2.0));
        assert!(grid.has_neighbor_within(Vec2::new(0.0, -3.0), 3.5));
        assert!(!grid.has_neighbor_within(Vec2::new(5.0, 5.0), 2.0));
    }

    #[test]
    fn cells_hold_multiple_points() {
        let mut grid = OccupancyGrid::new(10.0, Vec2::ZERO, Vec2::new(10.0, 10.0));
        grid.insert(Vec2::new(1.0, 1.0));
        grid.insert(Vec2::new(1.5, 1.0));
        assert_eq!(grid.len(), 2);
        assert!(grid.has_neighbor_within(Vec2::new(1.6, 1.0), 0.2));
    }

    #[test]
    fn matches_brute_force_on_random_points() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut grid = OccupancyGrid::new(3.0, Vec2::ZERO, Vec2::new(50.0, 50.0));
        let mut stored = Vec::new();
        for _ in 0..200 {
            let p = Vec2::new(rand01(&mut rng) * 50.0, rand01(&mut rng) * 50.0);
            grid.insert(p);
            stored.push(p);
        }
        for _ in 0..200 {
            let q = Vec2::new(rand01(&mut rng) * 60.0 - 5.0, rand01(&mut rng) * 60.0 - 5.0);
            for radius in [1.0, 3.0, 7.5] {
                let brute = stored.iter().any(|p| p.distance_squared(q) < radius * radius);
                assert_eq!(grid.has_neighbor_within(q, radius), brute);
            }
        }
    }

    #[test]
    fn huge_extent_caps_cell_count() {
        let grid = OccupancyGrid::new(0.01, Vec2::ZERO, Vec2::new(4000.0, 4000.0));
        assert!(grid.cols * grid.rows <= MAX_CELLS + 2 * (grid.cols + grid.rows) + 4);
    }

    #[test]
    fn vanishing_spacing_stays_bounded() {
        let mut grid = OccupancyGrid::new(1e-30, Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert!(grid.cols * grid.rows <= MAX_CELLS + 2 * (grid.cols + grid.rows) + 4);
        grid.insert(Vec2::new(50.0, 50.0));
        assert!(grid.has_neighbor_within(Vec2::new(50.0, 50.5), 1.0));
        assert!(!grid.has_neighbor_within(Vec2::new(60.0, 50.0), 1.0));
    }

    #[test]
    fn huge_radius_scans_the_whole_grid() {
        let mut grid = OccupancyGrid::new(1e-30, Vec2::ZERO, Vec2::new(100.0, 100.0));
        grid.insert(Vec2::new(1.0, 1.0));
        assert!(grid.has_neighbor_within(Vec2::new(99.0, 99.0), 1e30));
        assert!(grid.has_neighbor_within(Vec2::new(99.0, 99.0), f32::MAX));

        let mut grid = OccupancyGrid::new(2.0, Vec2::ZERO, Vec2::new(100.0, 100.0));
        grid.insert(Vec2::new(99.0, 99.0));
        assert!(grid.has_neighbor_within(Vec2::new(0.0, 0.0), 1e35));
    }

    #[test]
    fn covering_handles_empty_input() {
        let grid = OccupancyGrid::covering(2.0, std::iter::empty());
        assert!(grid.is_empty());
        assert!(!grid.has_neighbor_within(Vec2::ZERO, 5.0));
    }
}

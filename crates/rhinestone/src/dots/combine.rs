//! Dot-set combinators: greedy overlap removal, priority merge and rigid rotation.
//!
//! All three return a new list and leave their inputs untouched.
use glam::Vec2;

use super::{quantize, Dot};
use crate::sampling::occupancy::OccupancyGrid;

/// Keep dots in order, dropping any dot closer than `min_dist` to one already kept.
///
/// Earlier dots always win, so the result is deterministic for a given input order, and a
/// second pass with the same distance keeps everything.
pub fn remove_overlaps(dots: &[Dot], min_dist: f32) -> Vec<Dot> {
    if dots.len() < 2 || !min_dist.is_finite() || min_dist <= 0.0 {
        return dots.to_vec();
    }

    let mut index = OccupancyGrid::covering(min_dist, dots.iter().map(Dot::position));
    let mut kept = Vec::with_capacity(dots.len());
    for dot in dots {
        let p = dot.position();
        if !index.has_neighbor_within(p, min_dist) {
            index.insert(p);
            kept.push(dot.clone());
        }
    }
    kept
}

/// Keep every `priority` dot unchanged, then add each `secondary` dot that is at least
/// `min_dist` away from everything merged so far.
///
/// With no priority dots the secondary list is returned as is, without thinning it against
/// itself.
pub fn merge(priority: &[Dot], secondary: &[Dot], min_dist: f32) -> Vec<Dot> {
    if priority.is_empty() {
        return secondary.to_vec();
    }
    let mut merged = priority.to_vec();
    if secondary.is_empty() {
        return merged;
    }
    if !min_dist.is_finite() || min_dist <= 0.0 {
        merged.extend_from_slice(secondary);
        return merged;
    }

    let mut index = OccupancyGrid::covering(
        min_dist,
        priority.iter().chain(secondary).map(Dot::position),
    );
    for dot in priority {
        index.insert(dot.position());
    }
    for dot in secondary {
        let p = dot.position();
        if !index.has_neighbor_within(p, min_dist) {
            index.insert(p);
            merged.push(dot.clone());
        }
    }
    merged
}

/// Rotate every dot by `angle_deg` about the center of a `width`×`height` image.
///
/// Coordinates are re-quantized to 0.01; radius, shape and color are kept. A zero angle
/// returns the dots unchanged.
pub fn rotate(dots: &[Dot], angle_deg: f32, width: u32, height: u32) -> Vec<Dot> {
    if angle_deg == 0.0 || !angle_deg.is_finite() {
        return dots.to_vec();
    }
    let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
    let rot = Vec2::from_angle(angle_deg.to_radians());
    dots.iter()
        .map(|dot| {
            let p = center + rot.rotate(dot.position() - center);
            Dot {
                x: quantize(p.x),
                y: quantize(p.y),
                ..dot.clone()
            }
        })
        .collect()
}

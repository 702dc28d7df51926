//! Per-dot shape assignment.
use rand::Rng;

use super::{Dot, DotShape};
use crate::sampling::rand_index;

/// Give every dot an independent, uniformly chosen shape from [`DotShape::ALL`].
pub fn assign_random_shapes(dots: &[Dot], rng: &mut dyn Rng) -> Vec<Dot> {
    dots.iter()
        .map(|dot| {
            let shape = DotShape::ALL[rand_index(rng, DotShape::ALL.len())];
            dot.clone().with_shape(shape)
        })
        .collect()
}

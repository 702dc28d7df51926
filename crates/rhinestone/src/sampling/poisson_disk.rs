//! Density-aware Poisson-disk dot placement.
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::dots::combine::rotate;
use crate::dots::{quantize, Dot};
use crate::field::{DensityMap, Mask};
use crate::params::PlacementParams;
use crate::sampling::occupancy::OccupancyGrid;
use crate::sampling::{
    inputs_usable, local_spacing, rand01, rand_index, DotPlacement, DotSizing, PlacementBudget,
};

/// Poisson-disk placement whose spacing tightens where density is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoissonDiskPlacement {
    pub budget: PlacementBudget,
    /// Candidates tried around an active dot before it is retired.
    pub candidates_per_point: usize,
}

impl PoissonDiskPlacement {
    pub const DEFAULT_BUDGET: PlacementBudget =
        PlacementBudget::new(15_000, Duration::from_secs(30));
    pub const DEFAULT_CANDIDATES: usize = 20;

    pub fn new(budget: PlacementBudget) -> Self {
        Self {
            budget,
            candidates_per_point: Self::DEFAULT_CANDIDATES,
        }
    }

    pub fn with_candidates(mut self, k: usize) -> Self {
        self.candidates_per_point = k.max(1);
        self
    }
}

impl Default for PoissonDiskPlacement {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUDGET)
    }
}

impl DotPlacement for PoissonDiskPlacement {
    fn place(
        &self,
        mask: &Mask,
        density: &DensityMap,
        params: &PlacementParams,
        rng: &mut dyn Rng,
    ) -> Vec<Dot> {
        if !inputs_usable(mask, density, params) {
            return Vec::new();
        }
        let foreground = mask.foreground_count();
        if foreground == 0 {
            return Vec::new();
        }

        let mut sampler = PoissonDiskSampler::new(mask, density, params, self.candidates_per_point);
        let seed_index = rand_index(rng, foreground);
        let Some((sx, sy)) = mask.foreground_pixels().nth(seed_index) else {
            return Vec::new();
        };
        sampler.add(Dot::new(sx as f32, sy as f32, params.dot_radius));

        let started = Instant::now();
        sampler.run(rng, &self.budget, started);
        debug!(
            "Poisson placement: {} dots in {:?}.",
            sampler.dots.len(),
            started.elapsed()
        );

        let (w, h) = mask.dimensions();
        rotate(&sampler.dots, params.rotation, w, h)
    }
}

struct PoissonDiskSampler<'a> {
    mask: &'a Mask,
    density: &'a DensityMap,
    base_spacing: f32,
    density_multiplier: f32,
    sizing: DotSizing,
    candidates: usize,
    index: OccupancyGrid,
    active: Vec<Vec2>,
    dots: Vec<Dot>,
}

impl<'a> PoissonDiskSampler<'a> {
    fn new(
        mask: &'a Mask,
        density: &'a DensityMap,
        params: &PlacementParams,
        candidates: usize,
    ) -> Self {
        let (w, h) = mask.dimensions();
        // Cells sized for the tightest spacing the density rule can produce.
        let index = OccupancyGrid::new(
            params.min_spacing * 0.5,
            Vec2::ZERO,
            Vec2::new(w as f32, h as f32),
        );
        Self {
            mask,
            density,
            base_spacing: params.min_spacing,
            density_multiplier: params.density,
            sizing: DotSizing::from_params(params),
            candidates,
            index,
            active: Vec::new(),
            dots: Vec::new(),
        }
    }

    fn add(&mut self, dot: Dot) {
        let p = dot.position();
        self.index.insert(p);
        self.active.push(p);
        self.dots.push(dot);
    }

    /// Try to place one dot around `origin` that keeps `spacing` to every placed dot.
    fn candidate_around(
        &self,
        rng: &mut dyn Rng,
        origin: Vec2,
        spacing: f32,
    ) -> Option<Vec2> {
        for _ in 0..self.candidates {
            let angle = rand01(rng) * TAU;
            let distance = spacing + rand01(rng) * spacing;
            let raw = origin + Vec2::from_angle(angle) * distance;
            let candidate = Vec2::new(quantize(raw.x), quantize(raw.y));

            if !self.mask.contains(candidate) {
                continue;
            }
            if !self.index.has_neighbor_within(candidate, spacing) {
                return Some(candidate);
            }
        }
        None
    }

    fn run(&mut self, rng: &mut dyn Rng, budget: &PlacementBudget, started: Instant) {
        while !self.active.is_empty() {
            if budget.exhausted(self.dots.len(), started) {
                debug!(
                    "Poisson placement stopped at budget ({} dots, {:?}).",
                    self.dots.len(),
                    started.elapsed()
                );
                break;
            }

            let slot = rand_index(rng, self.active.len());
            let origin = self.active[slot];
            let spacing = local_spacing(
                self.base_spacing,
                self.density.sample(origin),
                self.density_multiplier,
            );

            match self.candidate_around(rng, origin, spacing) {
                Some(p) => {
                    let r = self.sizing.radius(self.density.sample(p));
                    self.add(Dot::at(p, r));
                }
                None => {
                    self.active.swap_remove(slot);
                }
            }
        }
    }
}

#![forbid(unsafe_code)]
//! rhinestone: turn raster images into sparse dot patterns for rhinestone and halftone work.
//!
//! Modules:
//! - field: foreground mask detection and the per-pixel density map (incl. EDT edge proximity)
//! - sampling: occupancy grid and dot placement (Poisson disk, hex grid, contour outline)
//! - dots: dot values, overlap removal, priority merge, rotation and shape assignment
//! - pipeline: bytes-to-dots orchestration
//!
//! Every entry point takes an explicit `RngCore`, so seeded runs are reproducible.
pub mod dots;
pub mod error;
pub mod field;
pub mod params;
pub mod pipeline;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use rhinestone::prelude::*;`.
pub mod prelude {
    pub use crate::dots::combine::{merge, remove_overlaps, rotate};
    pub use crate::dots::shapes::assign_random_shapes;
    pub use crate::dots::{Dot, DotShape, ShapeSelection};
    pub use crate::error::{Error, Result};
    pub use crate::field::{build_fields, DensityFields, DensityMap, FieldSettings, Mask};
    pub use crate::params::PlacementParams;
    pub use crate::pipeline::runner::{process, process_image};
    pub use crate::pipeline::ProcessOutput;
    pub use crate::sampling::occupancy::OccupancyGrid;
    pub use crate::sampling::{
        ContourOutlinePlacement, DotPlacement, HexGridPlacement, Method, PlacementBudget,
        PoissonDiskPlacement, SizingMode,
    };
}

//! Bytes-to-dots orchestration.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dots::Dot;

pub mod runner;

/// Multiplier on `min_spacing` for merging outline dots over the primary placement.
pub const CONTOUR_FOLLOW_MERGE_FACTOR: f32 = 0.65;

/// Standard deviation of the smoothing blur applied before segmentation.
pub const PRE_BLUR_SIGMA: f32 = 1.1;

/// Result of one processing run.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessOutput {
    pub dots: Vec<Dot>,
    /// Width of the resized image all dot coordinates refer to.
    pub working_width: u32,
    /// Height of the resized image all dot coordinates refer to.
    pub working_height: u32,
}

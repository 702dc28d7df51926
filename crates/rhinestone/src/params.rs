//! Placement parameters for a processing run.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dots::ShapeSelection;
use crate::error::{Error, Result};
use crate::field::FieldSettings;
use crate::sampling::{Method, SizingMode};

/// Knobs for one image-to-dots run. All lengths are in working-image pixels.
///
/// Callers that accept untrusted input should pass values through [`sanitized`] (clamping)
/// or [`validate`] (rejecting); the placement code stays total either way.
///
/// [`sanitized`]: PlacementParams::sanitized
/// [`validate`]: PlacementParams::validate
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementParams {
    /// Base dot radius, `1..=15`.
    pub dot_radius: f32,
    /// Base spacing between dot centers, `3..=30`.
    pub min_spacing: f32,
    /// Density multiplier, `0.1..=5`.
    pub density: f32,
    pub method: Method,
    /// Weight of edge proximity in the density map, `0..=1`.
    pub edge_strength: f32,
    /// Pattern rotation in degrees, `0..=360`.
    pub rotation: f32,
    /// Tone contrast, `0.1..=3`.
    pub contrast: f32,
    /// Flip the automatic foreground polarity.
    pub invert: bool,
    /// Lay outline dots over the primary placement.
    pub use_contour_follow: bool,
    pub dot_shape: ShapeSelection,
    pub sizing_mode: SizingMode,
    /// Canvas the input image is fitted into, `100..=4000` each.
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            dot_radius: 4.0,
            min_spacing: 10.0,
            density: 1.0,
            method: Method::Poisson,
            edge_strength: 0.6,
            rotation: 0.0,
            contrast: 1.2,
            invert: false,
            use_contour_follow: false,
            dot_shape: ShapeSelection::Circle,
            sizing_mode: SizingMode::Uniform,
            canvas_width: 800,
            canvas_height: 800,
        }
    }
}

impl PlacementParams {
    pub const DOT_RADIUS_RANGE: (f32, f32) = (1.0, 15.0);
    pub const MIN_SPACING_RANGE: (f32, f32) = (3.0, 30.0);
    pub const DENSITY_RANGE: (f32, f32) = (0.1, 5.0);
    pub const EDGE_STRENGTH_RANGE: (f32, f32) = (0.0, 1.0);
    pub const ROTATION_RANGE: (f32, f32) = (0.0, 360.0);
    pub const CONTRAST_RANGE: (f32, f32) = (0.1, 3.0);
    pub const CANVAS_RANGE: (u32, u32) = (100, 4000);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dot_radius(mut self, dot_radius: f32) -> Self {
        self.dot_radius = dot_radius;
        self
    }

    pub fn with_min_spacing(mut self, min_spacing: f32) -> Self {
        self.min_spacing = min_spacing;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_edge_strength(mut self, edge_strength: f32) -> Self {
        self.edge_strength = edge_strength;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_contour_follow(mut self, use_contour_follow: bool) -> Self {
        self.use_contour_follow = use_contour_follow;
        self
    }

    pub fn with_dot_shape(mut self, dot_shape: impl Into<ShapeSelection>) -> Self {
        self.dot_shape = dot_shape.into();
        self
    }

    pub fn with_sizing_mode(mut self, sizing_mode: SizingMode) -> Self {
        self.sizing_mode = sizing_mode;
        self
    }

    /// Sets the canvas the input image is fitted into.
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Density field settings carried by these parameters.
    pub fn field_settings(&self) -> FieldSettings {
        FieldSettings {
            invert: self.invert,
            edge_strength: self.edge_strength,
            contrast: self.contrast,
        }
    }

    /// Validates every numeric parameter against its documented range.
    pub fn validate(&self) -> Result<()> {
        check_range("dot_radius", self.dot_radius, Self::DOT_RADIUS_RANGE)?;
        check_range("min_spacing", self.min_spacing, Self::MIN_SPACING_RANGE)?;
        check_range("density", self.density, Self::DENSITY_RANGE)?;
        check_range("edge_strength", self.edge_strength, Self::EDGE_STRENGTH_RANGE)?;
        check_range("rotation", self.rotation, Self::ROTATION_RANGE)?;
        check_range("contrast", self.contrast, Self::CONTRAST_RANGE)?;

        let (lo, hi) = Self::CANVAS_RANGE;
        for (name, v) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ] {
            if !(lo..=hi).contains(&v) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be in {lo}..={hi}, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Returns a copy with every numeric parameter clamped into its range.
    ///
    /// Non-finite values are replaced by the default.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let (lo, hi) = Self::CANVAS_RANGE;
        Self {
            dot_radius: clamp_f32(
                "dot_radius",
                self.dot_radius,
                Self::DOT_RADIUS_RANGE,
                d.dot_radius,
            ),
            min_spacing: clamp_f32(
                "min_spacing",
                self.min_spacing,
                Self::MIN_SPACING_RANGE,
                d.min_spacing,
            ),
            density: clamp_f32("density", self.density, Self::DENSITY_RANGE, d.density),
            edge_strength: clamp_f32(
                "edge_strength",
                self.edge_strength,
                Self::EDGE_STRENGTH_RANGE,
                d.edge_strength,
            ),
            rotation: clamp_f32("rotation", self.rotation, Self::ROTATION_RANGE, d.rotation),
            contrast: clamp_f32("contrast", self.contrast, Self::CONTRAST_RANGE, d.contrast),
            canvas_width: self.canvas_width.clamp(lo, hi),
            canvas_height: self.canvas_height.clamp(lo, hi),
            ..self.clone()
        }
    }
}

fn check_range(name: &str, v: f32, (lo, hi): (f32, f32)) -> Result<()> {
    if v.is_finite() && (lo..=hi).contains(&v) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be in {lo}..={hi}, got {v}"
        )))
    }
}

fn clamp_f32(name: &str, v: f32, (lo, hi): (f32, f32), default: f32) -> f32 {
    if !v.is_finite() {
        warn!("{} is {}; using default {}.", name, v, default);
        return default;
    }
    let clamped = v.clamp(lo, hi);
    if clamped != v {
        warn!("{} {} out of range; clamped to {}.", name, v, clamped);
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dots::DotShape;

    #[test]
    fn defaults_are_valid() {
        let params = PlacementParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.method, Method::Poisson);
        assert_eq!(params.dot_shape, ShapeSelection::Circle);
        assert_eq!(params.sizing_mode, SizingMode::Uniform);
        assert_eq!((params.canvas_width, params.canvas_height), (800, 800));
    }

    #[test]
    fn builders_set_fields() {
        let params = PlacementParams::new()
            .with_dot_radius(2.5)
            .with_min_spacing(6.0)
            .with_method(Method::Grid)
            .with_dot_shape(DotShape::Star)
            .with_canvas(300, 200)
            .with_contour_follow(true);
        assert_eq!(params.dot_radius, 2.5);
        assert_eq!(params.min_spacing, 6.0);
        assert_eq!(params.method, Method::Grid);
        assert_eq!(params.dot_shape, ShapeSelection::Star);
        assert_eq!((params.canvas_width, params.canvas_height), (300, 200));
        assert!(params.use_contour_follow);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let err = PlacementParams::default()
            .with_min_spacing(1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("min_spacing")));
        assert!(PlacementParams::default()
            .with_density(f32::NAN)
            .validate()
            .is_err());
        assert!(PlacementParams::default()
            .with_canvas(50, 800)
            .validate()
            .is_err());
    }

    #[test]
    fn sanitized_clamps_and_replaces_non_finite() {
        let params = PlacementParams::default()
            .with_dot_radius(100.0)
            .with_min_spacing(0.0)
            .with_contrast(f32::INFINITY)
            .with_rotation(-20.0)
            .with_canvas(10, 9000)
            .with_invert(true)
            .sanitized();
        assert_eq!(params.dot_radius, 15.0);
        assert_eq!(params.min_spacing, 3.0);
        assert_eq!(params.contrast, 1.2);
        assert_eq!(params.rotation, 0.0);
        assert_eq!((params.canvas_width, params.canvas_height), (100, 4000));
        assert!(params.invert);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn field_settings_follow_params() {
        let settings = PlacementParams::default()
            .with_edge_strength(0.25)
            .with_contrast(2.0)
            .with_invert(true)
            .field_settings();
        assert_eq!(
            settings,
            FieldSettings {
                invert: true,
                edge_strength: 0.25,
                contrast: 2.0,
            }
        );
    }
}

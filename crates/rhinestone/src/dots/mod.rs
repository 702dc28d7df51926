//! Dot values and dot-set transforms.
//!
//! A dot list is an ordered `Vec<Dot>`; order only matters as priority during merge and
//! overlap removal, where earlier dots win.
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;

pub mod combine;
pub mod shapes;

/// Round to the 0.01 grid used for every emitted coordinate and radius.
#[inline]
pub(crate) fn quantize(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Flat shape primitive used to render a dot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DotShape {
    #[default]
    Circle,
    Diamond,
    Star,
    Hexagon,
}

impl DotShape {
    /// Every shape, in the order used for random assignment.
    pub const ALL: [DotShape; 4] = [
        DotShape::Circle,
        DotShape::Star,
        DotShape::Diamond,
        DotShape::Hexagon,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DotShape::Circle => "circle",
            DotShape::Diamond => "diamond",
            DotShape::Star => "star",
            DotShape::Hexagon => "hexagon",
        }
    }
}

impl fmt::Display for DotShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DotShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(DotShape::Circle),
            "diamond" => Ok(DotShape::Diamond),
            "star" => Ok(DotShape::Star),
            "hexagon" => Ok(DotShape::Hexagon),
            other => Err(Error::InvalidConfig(format!("unknown dot shape '{other}'"))),
        }
    }
}

/// Requested shape for a whole run: one fixed shape, or an independent random shape per dot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShapeSelection {
    #[default]
    Circle,
    Diamond,
    Star,
    Hexagon,
    Random,
}

impl ShapeSelection {
    /// The fixed shape, or `None` for [`ShapeSelection::Random`].
    pub fn fixed(self) -> Option<DotShape> {
        match self {
            ShapeSelection::Circle => Some(DotShape::Circle),
            ShapeSelection::Diamond => Some(DotShape::Diamond),
            ShapeSelection::Star => Some(DotShape::Star),
            ShapeSelection::Hexagon => Some(DotShape::Hexagon),
            ShapeSelection::Random => None,
        }
    }

    /// Parse a shape name, falling back to [`ShapeSelection::Circle`] for unknown input.
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("random") {
            return ShapeSelection::Random;
        }
        match s.parse::<DotShape>() {
            Ok(shape) => shape.into(),
            Err(e) => {
                warn!("{}; using circle.", e);
                ShapeSelection::default()
            }
        }
    }
}

impl From<DotShape> for ShapeSelection {
    fn from(shape: DotShape) -> Self {
        match shape {
            DotShape::Circle => ShapeSelection::Circle,
            DotShape::Diamond => ShapeSelection::Diamond,
            DotShape::Star => ShapeSelection::Star,
            DotShape::Hexagon => ShapeSelection::Hexagon,
        }
    }
}

/// A placed dot. `shape` is only set when the run assigns per-dot shapes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub shape: Option<DotShape>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub color: Option<String>,
}

impl Dot {
    /// Create a dot with position and radius quantized to 0.01.
    pub fn new(x: f32, y: f32, r: f32) -> Self {
        Self {
            x: quantize(x),
            y: quantize(y),
            r: quantize(r),
            shape: None,
            color: None,
        }
    }

    pub fn at(position: Vec2, r: f32) -> Self {
        Self::new(position.x, position.y, r)
    }

    pub fn with_shape(mut self, shape: DotShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_quantizes_to_hundredths() {
        let dot = Dot::new(1.234_56, 9.999, 3.005_1);
        assert!((dot.x - 1.23).abs() < 1e-6);
        assert!((dot.y - 10.0).abs() < 1e-6);
        assert!((dot.r - 3.01).abs() < 1e-6);
        assert_eq!(dot.shape, None);
    }

    #[test]
    fn shape_parsing_is_case_insensitive() {
        assert_eq!("Hexagon".parse::<DotShape>().unwrap(), DotShape::Hexagon);
        assert!("blob".parse::<DotShape>().is_err());
    }

    #[test]
    fn lenient_selection_falls_back_to_circle() {
        assert_eq!(ShapeSelection::parse_lenient("random"), ShapeSelection::Random);
        assert_eq!(ShapeSelection::parse_lenient(" STAR "), ShapeSelection::Star);
        assert_eq!(ShapeSelection::parse_lenient("squiggle"), ShapeSelection::Circle);
        assert_eq!(ShapeSelection::Random.fixed(), None);
        assert_eq!(ShapeSelection::Diamond.fixed(), Some(DotShape::Diamond));
    }

    #[test]
    fn builders_set_optional_fields() {
        let dot = Dot::new(0.0, 0.0, 1.0)
            .with_shape(DotShape::Star)
            .with_color("#ff00aa");
        assert_eq!(dot.shape, Some(DotShape::Star));
        assert_eq!(dot.color.as_deref(), Some("#ff00aa"));
    }
}

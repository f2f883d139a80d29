//! Domain primitives: zone kinds, interaction tools, units, and the
//! calibrated pixel ratio.
//!
//! Design goals:
//! - No raw `f64` ratio in domain logic (validated newtype)
//! - Illegal states unrepresentable (closed enums, explicit
//!   `RealArea::Uncalibrated` instead of a numeric placeholder)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// The three irrigation-relevant classifications a closed polygon carries.
///
/// Deliberately smaller than [`Tool`]: ruler and delete are interaction
/// modes and never tag a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Regular,
    Drip,
    Exclusion,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 3] = [ZoneKind::Regular, ZoneKind::Drip, ZoneKind::Exclusion];

    /// Classification priority when shapes overlap. Higher wins:
    /// exclusion > drip > regular.
    pub fn priority(self) -> u8 {
        match self {
            ZoneKind::Regular => 0,
            ZoneKind::Drip => 1,
            ZoneKind::Exclusion => 2,
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKind::Regular => write!(f, "regular"),
            ZoneKind::Drip => write!(f, "drip"),
            ZoneKind::Exclusion => write!(f, "exclusion"),
        }
    }
}

/// The externally-selected interaction tool.
///
/// The engine reads this to decide what kind to stamp on a newly closed
/// polygon and which pointer interaction is active; it never owns the
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Regular,
    Drip,
    Exclusion,
    Ruler,
    Delete,
}

impl Tool {
    /// The zone kind this tool stamps onto closed polygons, if it is a
    /// drawing tool.
    pub fn zone_kind(self) -> Option<ZoneKind> {
        match self {
            Tool::Regular => Some(ZoneKind::Regular),
            Tool::Drip => Some(ZoneKind::Drip),
            Tool::Exclusion => Some(ZoneKind::Exclusion),
            Tool::Ruler | Tool::Delete => None,
        }
    }
}

/// Real-world linear unit declared during calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "m")]
    Meters,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Feet => write!(f, "ft"),
            Unit::Meters => write!(f, "m"),
        }
    }
}

/// Real-world units per pixel, derived from ruler calibration.
///
/// Construction validates the value; a `PixelRatio` always holds a
/// positive finite number. "Not yet calibrated" is `Option::None` at the
/// session level, never a sentinel value in here.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PixelRatio(f64);

impl PixelRatio {
    /// Create a PixelRatio with validation (rejects NaN, infinite, zero,
    /// negative).
    pub fn try_new(units_per_px: f64) -> Result<Self, NumericError> {
        if units_per_px.is_nan() {
            Err(NumericError::NaN)
        } else if units_per_px.is_infinite() {
            Err(NumericError::Infinite)
        } else if units_per_px == 0.0 {
            Err(NumericError::Zero)
        } else if units_per_px < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(PixelRatio(units_per_px))
        }
    }

    /// Get the raw value (use sparingly, prefer typed conversions)
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Convert a pixel distance to real-world units.
    #[inline]
    pub fn real_length(self, px: f64) -> f64 {
        px * self.0
    }

    /// Convert a pixel area to real-world square units. Area scales with
    /// the square of the linear ratio.
    #[inline]
    pub fn real_area(self, px_area: f64) -> f64 {
        px_area * self.0 * self.0
    }
}

/// A pixel ratio together with the unit it was calibrated in.
///
/// The pair is set atomically at calibration time so a ratio can never be
/// displayed in the wrong unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub ratio: PixelRatio,
    pub unit: Unit,
}

/// A real-world area for display, or the explicit uncalibrated state.
///
/// Uncalibrated propagates verbatim to formatting layers; it is never
/// coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RealArea {
    Uncalibrated,
    Square { value: f64, unit: Unit },
}

impl RealArea {
    /// Convert a pixel area using the session's calibration, if any.
    pub fn from_pixels(px_area: f64, calibration: Option<Calibration>) -> Self {
        match calibration {
            Some(c) => RealArea::Square {
                value: c.ratio.real_area(px_area),
                unit: c.unit,
            },
            None => RealArea::Uncalibrated,
        }
    }
}

impl fmt::Display for RealArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealArea::Uncalibrated => write!(f, "uncalibrated"),
            RealArea::Square { value, unit } => write!(f, "{value:.2} sq {unit}"),
        }
    }
}

/// Pixel dimensions of the traced canvas.
///
/// Absent dimensions (no image loaded yet) make every grid-dependent
/// operation an empty no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

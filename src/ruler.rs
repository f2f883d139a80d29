//! Ruler placement and pixel-to-real-unit calibration.
//!
//! A ruler is one drag gesture: two pixel-space endpoints. Declaring the
//! segment's real-world length derives the session's pixel ratio. At
//! most one ruler is live at a time; placing a new one replaces the old
//! in full (no multi-ruler averaging).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::errors::CalibrationError;
use crate::geometry::distance;
use crate::types::{PixelRatio, Unit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruler {
    pub start: DVec2,
    pub end: DVec2,
    /// Declared real-world length. `0.0` is the valid
    /// placed-but-not-yet-calibrated state.
    pub real_length: f64,
    pub unit: Unit,
}

impl Ruler {
    /// Place a fresh, uncalibrated ruler segment.
    pub fn place(start: DVec2, end: DVec2) -> Self {
        Self {
            start,
            end,
            real_length: 0.0,
            unit: Unit::Meters,
        }
    }

    /// Length of the reference segment in pixels.
    pub fn pixel_length(&self) -> f64 {
        distance(self.start, self.end)
    }

    pub fn is_calibrated(&self) -> bool {
        self.real_length > 0.0
    }

    /// Parse a user-entered length string and derive the pixel ratio.
    ///
    /// `real_length` and `unit` are updated together only after every
    /// check passes; on any error the ruler is untouched, which lets the
    /// caller treat failures as a silent no-op and re-prompt.
    pub fn calibrate(&mut self, input: &str, unit: Unit) -> Result<PixelRatio, CalibrationError> {
        let declared: f64 = input
            .trim()
            .parse()
            .map_err(|_| CalibrationError::InvalidLength {
                input: input.to_string(),
            })?;
        if !declared.is_finite() || declared <= 0.0 {
            return Err(CalibrationError::NonPositiveLength);
        }

        let px = self.pixel_length();
        if px == 0.0 {
            return Err(CalibrationError::DegenerateRuler);
        }

        let ratio =
            PixelRatio::try_new(declared / px).map_err(|_| CalibrationError::DegenerateRuler)?;
        self.real_length = declared;
        self.unit = unit;
        Ok(ratio)
    }
}

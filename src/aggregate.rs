//! Per-kind area totals and real-unit conversion.
//!
//! Totals are derived from the region set, so overlap resolution has
//! already happened by the time areas are summed: each cell counts for
//! exactly one kind.

use std::fmt;

use glam::DVec2;

use crate::segment::Segmentation;
use crate::types::{Calibration, RealArea, ZoneKind};

/// Per-kind pixel areas summed over all regions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoneTotals {
    pub regular: f64,
    pub drip: f64,
    pub exclusion: f64,
}

impl ZoneTotals {
    pub fn from_segmentation(seg: &Segmentation) -> Self {
        let cell = seg.grid().cell;
        let mut totals = Self::default();
        for region in seg.regions() {
            let area = region.pixel_area(cell);
            match region.kind {
                ZoneKind::Regular => totals.regular += area,
                ZoneKind::Drip => totals.drip += area,
                ZoneKind::Exclusion => totals.exclusion += area,
            }
        }
        totals
    }

    pub fn pixel_area(&self, kind: ZoneKind) -> f64 {
        match kind {
            ZoneKind::Regular => self.regular,
            ZoneKind::Drip => self.drip,
            ZoneKind::Exclusion => self.exclusion,
        }
    }
}

/// Formatted per-kind totals in real-world units.
///
/// Without calibration every entry is the explicit uncalibrated marker,
/// never a numeric default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaReport {
    pub regular: RealArea,
    pub drip: RealArea,
    pub exclusion: RealArea,
}

impl AreaReport {
    pub fn new(totals: ZoneTotals, calibration: Option<Calibration>) -> Self {
        Self {
            regular: RealArea::from_pixels(totals.regular, calibration),
            drip: RealArea::from_pixels(totals.drip, calibration),
            exclusion: RealArea::from_pixels(totals.exclusion, calibration),
        }
    }
}

impl fmt::Display for AreaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "regular: {}\ndrip: {}\nexclusion: {}",
            self.regular, self.drip, self.exclusion
        )
    }
}

/// The formatted area of the region under a cursor position, if any.
pub fn region_area_at(
    seg: &Segmentation,
    p: DVec2,
    calibration: Option<Calibration>,
) -> Option<RealArea> {
    let region = seg.region_at(p)?;
    let px_area = region.pixel_area(seg.grid().cell);
    Some(RealArea::from_pixels(px_area, calibration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;
    use crate::store::Shape;
    use crate::types::{CanvasSize, PixelRatio, Unit};
    use glam::dvec2;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64, kind: ZoneKind) -> Shape {
        let ring = vec![
            dvec2(x0, y0),
            dvec2(x1, y0),
            dvec2(x1, y1),
            dvec2(x0, y1),
            dvec2(x0, y0),
        ];
        Shape::from_ring(ring, kind).unwrap()
    }

    fn calibration(units_per_px: f64, unit: Unit) -> Calibration {
        Calibration {
            ratio: PixelRatio::try_new(units_per_px).unwrap(),
            unit,
        }
    }

    #[test]
    fn totals_sum_region_cells_per_kind() {
        let shapes = [
            rect(0.0, 0.0, 100.0, 100.0, ZoneKind::Regular),
            rect(20.0, 20.0, 70.0, 70.0, ZoneKind::Drip),
        ];
        let seg = segment(&shapes, Some(CanvasSize::new(100.0, 100.0)));
        let totals = ZoneTotals::from_segmentation(&seg);
        assert_eq!(totals.regular, 7_500.0);
        assert_eq!(totals.drip, 2_500.0);
        assert_eq!(totals.exclusion, 0.0);
    }

    #[test]
    fn report_without_calibration_is_uncalibrated_everywhere() {
        let totals = ZoneTotals {
            regular: 10_000.0,
            drip: 2_500.0,
            exclusion: 0.0,
        };
        let report = AreaReport::new(totals, None);
        assert_eq!(report.regular, RealArea::Uncalibrated);
        assert_eq!(report.drip, RealArea::Uncalibrated);
        insta::assert_snapshot!(
            report.to_string(),
            @"regular: uncalibrated\ndrip: uncalibrated\nexclusion: uncalibrated"
        );
    }

    #[test]
    fn report_converts_with_squared_ratio() {
        let totals = ZoneTotals {
            regular: 7_500.0,
            drip: 2_500.0,
            exclusion: 0.0,
        };
        let report = AreaReport::new(totals, Some(calibration(0.1, Unit::Meters)));
        assert_eq!(report.regular.to_string(), "75.00 sq m");
        assert_eq!(report.drip.to_string(), "25.00 sq m");
        assert_eq!(report.exclusion.to_string(), "0.00 sq m");
    }

    #[test]
    fn hover_reports_the_owning_regions_area() {
        let shapes = [rect(0.0, 0.0, 50.0, 50.0, ZoneKind::Drip)];
        let seg = segment(&shapes, Some(CanvasSize::new(100.0, 100.0)));

        let hovered = region_area_at(&seg, dvec2(25.0, 25.0), Some(calibration(0.2, Unit::Feet)));
        // 25 cells * 100 px^2 * 0.04 = 100 sq ft
        assert_eq!(hovered.map(|a| a.to_string()).as_deref(), Some("100.00 sq ft"));

        assert_eq!(region_area_at(&seg, dvec2(90.0, 90.0), None), None);
    }
}

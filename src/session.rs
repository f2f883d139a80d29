//! The explicit session context driving the engine.
//!
//! A [`Session`] owns all otherwise-ambient mutable state: the zone
//! store, the live ruler, the calibration, canvas dimensions, the
//! polygon capture machine, and the segmentation cache. Collaborators
//! feed it pointer events plus the externally-selected tool; it hands
//! back the data to draw and the formatted totals.

use glam::DVec2;

use crate::aggregate::{self, AreaReport, ZoneTotals};
use crate::capture::{Capture, Commit};
use crate::errors::CalibrationError;
use crate::log::debug;
use crate::ruler::Ruler;
use crate::segment::{SegmentCache, Segmentation};
use crate::store::{Shape, ZoneStore};
use crate::types::{Calibration, CanvasSize, RealArea, Tool, Unit, ZoneKind};

/// What a pointer event changed, for collaborators that react to it
/// (e.g. opening the calibration prompt after a ruler drag).
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PolygonStarted,
    VertexAdded,
    ShapeClosed { kind: ZoneKind, area: f64 },
    ShapeDeleted { kind: ZoneKind },
    RulerPlaced { pixel_length: f64 },
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    store: ZoneStore,
    ruler: Option<Ruler>,
    calibration: Option<Calibration>,
    canvas: Option<CanvasSize>,
    capture: Capture,
    tool: Option<Tool>,
    /// Start point of an in-flight ruler drag.
    ruler_drag: Option<DVec2>,
    cache: SegmentCache,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from independently-restored persisted fields.
    pub(crate) fn restore(
        shapes: Vec<Shape>,
        ruler: Option<Ruler>,
        ratio: Option<crate::types::PixelRatio>,
        canvas: Option<CanvasSize>,
    ) -> Self {
        // A persisted ratio without a ruler keeps its meaning; the unit
        // falls back to the default when the ruler entry was lost.
        let unit = ruler.as_ref().map(|r| r.unit).unwrap_or(Unit::Meters);
        let calibration = ratio.map(|ratio| Calibration { ratio, unit });
        Self {
            store: ZoneStore::from_shapes(shapes),
            ruler,
            calibration,
            canvas,
            ..Self::default()
        }
    }

    // ==================== external selections ====================

    /// Read the externally-owned tool selection. Switching tools never
    /// retags vertices already committed to an in-progress polygon; the
    /// kind is stamped only at closure time.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == Some(tool) {
            return;
        }
        // An unfinished ruler drag belongs to the old mode.
        self.ruler_drag = None;
        self.tool = Some(tool);
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn set_canvas_size(&mut self, canvas: Option<CanvasSize>) {
        self.canvas = canvas;
    }

    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.canvas
    }

    // ==================== pointer events ====================

    pub fn pointer_pressed(&mut self, p: DVec2) {
        if self.tool == Some(Tool::Ruler) {
            self.ruler_drag = Some(p);
        }
    }

    pub fn pointer_moved(&mut self, p: DVec2) {
        self.capture.hover(p);
    }

    /// Pointer left the canvas: only the live provisional cursor is
    /// cancelled, never the accumulated vertices.
    pub fn pointer_left(&mut self) {
        self.capture.leave();
    }

    pub fn pointer_released(&mut self, p: DVec2) -> Option<SessionEvent> {
        match self.tool {
            Some(Tool::Ruler) => {
                let start = self.ruler_drag.take()?;
                let ruler = Ruler::place(start, p);
                let pixel_length = ruler.pixel_length();
                debug!("ruler placed, {pixel_length:.1} px");
                self.ruler = Some(ruler);
                Some(SessionEvent::RulerPlaced { pixel_length })
            }
            Some(Tool::Delete) => self.delete_at(p),
            Some(tool) => {
                let kind = tool.zone_kind()?;
                match self.capture.commit(p) {
                    Commit::Started => Some(SessionEvent::PolygonStarted),
                    Commit::Extended => Some(SessionEvent::VertexAdded),
                    Commit::Closed(ring) => {
                        let shape = Shape::from_ring(ring, kind)?;
                        let area = shape.area;
                        self.store.push(shape);
                        Some(SessionEvent::ShapeClosed { kind, area })
                    }
                }
            }
            None => None,
        }
    }

    /// Remove the first-inserted shape containing `p`, if any.
    pub fn delete_at(&mut self, p: DVec2) -> Option<SessionEvent> {
        let removed = self.store.remove_at(p)?;
        Some(SessionEvent::ShapeDeleted { kind: removed.kind })
    }

    /// Abandon the in-progress polygon.
    pub fn cancel_capture(&mut self) {
        self.capture.cancel();
    }

    /// Remove every zone at once. The ruler and calibration survive.
    pub fn clear_zones(&mut self) {
        self.store.clear();
    }

    // ==================== calibration ====================

    /// Confirm the calibration prompt with a user-entered length string.
    ///
    /// On error nothing changes: the caller re-prompts. On success the
    /// ruler's declared length/unit and the session calibration update
    /// together.
    pub fn calibrate(&mut self, input: &str, unit: Unit) -> Result<(), CalibrationError> {
        let ruler = self.ruler.as_mut().ok_or(CalibrationError::NoRuler)?;
        let ratio = ruler.calibrate(input, unit)?;
        self.calibration = Some(Calibration { ratio, unit });
        Ok(())
    }

    pub fn calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    pub fn ruler(&self) -> Option<&Ruler> {
        self.ruler.as_ref()
    }

    // ==================== data to draw ====================

    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    /// Committed vertices and live cursor of the in-progress polygon.
    pub fn in_progress(&self) -> Option<(&[DVec2], Option<DVec2>)> {
        self.capture.preview()
    }

    /// The memoized region set. Recomputed only when the zone store or
    /// canvas dimensions changed since the last query.
    pub fn segmentation(&mut self) -> &Segmentation {
        self.cache.get_or_compute(&self.store, self.canvas)
    }

    pub fn totals(&mut self) -> ZoneTotals {
        let seg = self.cache.get_or_compute(&self.store, self.canvas);
        ZoneTotals::from_segmentation(seg)
    }

    pub fn report(&mut self) -> AreaReport {
        let calibration = self.calibration;
        let seg = self.cache.get_or_compute(&self.store, self.canvas);
        AreaReport::new(ZoneTotals::from_segmentation(seg), calibration)
    }

    /// Formatted area of the region under the cursor, for tooltips.
    pub fn hovered_area(&mut self, p: DVec2) -> Option<RealArea> {
        let calibration = self.calibration;
        let seg = self.cache.get_or_compute(&self.store, self.canvas);
        aggregate::region_area_at(seg, p, calibration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn draw_square(session: &mut Session, origin: f64, side: f64, tool: Tool) {
        session.set_tool(tool);
        session.pointer_released(dvec2(origin, origin));
        session.pointer_released(dvec2(origin + side, origin));
        session.pointer_released(dvec2(origin + side, origin + side));
        session.pointer_released(dvec2(origin, origin + side));
        // Snap back onto the first vertex.
        session.pointer_released(dvec2(origin, origin));
    }

    #[test]
    fn closing_a_polygon_appends_a_shape() {
        let mut session = Session::new();
        session.set_canvas_size(Some(CanvasSize::new(100.0, 100.0)));
        draw_square(&mut session, 0.0, 100.0, Tool::Regular);

        assert_eq!(session.shapes().len(), 1);
        assert_eq!(session.shapes()[0].kind, ZoneKind::Regular);
        assert_eq!(session.shapes()[0].area, 10_000.0);
        assert!(session.in_progress().is_none());
    }

    #[test]
    fn kind_is_stamped_at_closure_time() {
        let mut session = Session::new();
        session.set_tool(Tool::Regular);
        session.pointer_released(dvec2(0.0, 0.0));
        session.pointer_released(dvec2(100.0, 0.0));
        session.pointer_released(dvec2(100.0, 100.0));

        // Mid-polygon tool switch: the closed shape takes the new kind.
        session.set_tool(Tool::Drip);
        let event = session.pointer_released(dvec2(2.0, 2.0));
        assert!(matches!(
            event,
            Some(SessionEvent::ShapeClosed {
                kind: ZoneKind::Drip,
                ..
            })
        ));
        assert_eq!(session.shapes()[0].kind, ZoneKind::Drip);
    }

    #[test]
    fn pointer_leave_preserves_committed_vertices() {
        let mut session = Session::new();
        session.set_tool(Tool::Exclusion);
        session.pointer_released(dvec2(0.0, 0.0));
        session.pointer_released(dvec2(50.0, 0.0));
        session.pointer_moved(dvec2(60.0, 20.0));
        session.pointer_left();

        let (vertices, cursor) = session.in_progress().unwrap();
        assert_eq!(vertices.len(), 2);
        assert_eq!(cursor, None);
    }

    #[test]
    fn ruler_drag_places_and_replaces() {
        let mut session = Session::new();
        session.set_tool(Tool::Ruler);
        session.pointer_pressed(dvec2(0.0, 0.0));
        let event = session.pointer_released(dvec2(30.0, 40.0));
        assert_eq!(event, Some(SessionEvent::RulerPlaced { pixel_length: 50.0 }));

        session.pointer_pressed(dvec2(0.0, 0.0));
        session.pointer_released(dvec2(80.0, 0.0));
        assert_eq!(session.ruler().unwrap().pixel_length(), 80.0);
    }

    #[test]
    fn release_without_press_places_no_ruler() {
        let mut session = Session::new();
        session.set_tool(Tool::Ruler);
        assert_eq!(session.pointer_released(dvec2(10.0, 10.0)), None);
        assert!(session.ruler().is_none());
    }

    #[test]
    fn calibrate_without_ruler_is_an_error() {
        let mut session = Session::new();
        assert_eq!(
            session.calibrate("5", Unit::Meters),
            Err(CalibrationError::NoRuler)
        );
    }

    #[test]
    fn failed_calibration_changes_nothing() {
        let mut session = Session::new();
        session.set_tool(Tool::Ruler);
        session.pointer_pressed(dvec2(0.0, 0.0));
        session.pointer_released(dvec2(50.0, 0.0));

        assert!(session.calibrate("not a number", Unit::Meters).is_err());
        assert_eq!(session.calibration(), None);
        assert!(!session.ruler().unwrap().is_calibrated());
    }

    #[test]
    fn successful_calibration_updates_ruler_and_ratio_together() {
        let mut session = Session::new();
        session.set_tool(Tool::Ruler);
        session.pointer_pressed(dvec2(0.0, 0.0));
        session.pointer_released(dvec2(50.0, 0.0));

        session.calibrate("5", Unit::Feet).unwrap();
        let calibration = session.calibration().unwrap();
        assert_eq!(calibration.ratio.get(), 0.1);
        assert_eq!(calibration.unit, Unit::Feet);
        assert_eq!(session.ruler().unwrap().real_length, 5.0);
        assert_eq!(session.ruler().unwrap().unit, Unit::Feet);
    }

    #[test]
    fn delete_tool_removes_on_release() {
        let mut session = Session::new();
        session.set_canvas_size(Some(CanvasSize::new(100.0, 100.0)));
        draw_square(&mut session, 0.0, 50.0, Tool::Regular);

        session.set_tool(Tool::Delete);
        let event = session.pointer_released(dvec2(25.0, 25.0));
        assert!(matches!(event, Some(SessionEvent::ShapeDeleted { .. })));
        assert!(session.shapes().is_empty());
    }

    #[test]
    fn clear_zones_empties_the_store_and_derived_regions() {
        let mut session = Session::new();
        session.set_canvas_size(Some(CanvasSize::new(100.0, 100.0)));
        draw_square(&mut session, 0.0, 50.0, Tool::Regular);
        draw_square(&mut session, 60.0, 30.0, Tool::Drip);
        assert_eq!(session.segmentation().regions().len(), 2);

        session.clear_zones();
        assert!(session.shapes().is_empty());
        assert!(session.segmentation().regions().is_empty());
    }

    #[test]
    fn no_canvas_means_empty_regions_and_no_hover() {
        let mut session = Session::new();
        draw_square(&mut session, 0.0, 100.0, Tool::Regular);

        assert!(session.segmentation().regions().is_empty());
        assert_eq!(session.hovered_area(dvec2(50.0, 50.0)), None);
        assert_eq!(session.totals(), ZoneTotals::default());
    }

    #[test]
    fn report_is_uncalibrated_until_ruler_confirmed() {
        let mut session = Session::new();
        session.set_canvas_size(Some(CanvasSize::new(100.0, 100.0)));
        draw_square(&mut session, 0.0, 100.0, Tool::Regular);

        let report = session.report();
        assert_eq!(report.regular, RealArea::Uncalibrated);

        session.set_tool(Tool::Ruler);
        session.pointer_pressed(dvec2(0.0, 0.0));
        session.pointer_released(dvec2(100.0, 0.0));
        session.calibrate("10", Unit::Meters).unwrap();

        let report = session.report();
        assert_eq!(report.regular.to_string(), "100.00 sq m");
    }

    #[test]
    fn tool_switch_aborts_inflight_ruler_drag() {
        let mut session = Session::new();
        session.set_tool(Tool::Ruler);
        session.pointer_pressed(dvec2(0.0, 0.0));
        session.set_tool(Tool::Regular);
        session.set_tool(Tool::Ruler);
        assert_eq!(session.pointer_released(dvec2(50.0, 0.0)), None);
        assert!(session.ruler().is_none());
    }
}

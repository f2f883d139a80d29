//! Single-winner zone classification.
//!
//! A sampled point belongs to the highest-priority kind among all shapes
//! containing it (exclusion > drip > regular), or to no kind at all.
//! This makes regions of different kinds mutually exclusive even when
//! their source polygons geometrically overlap: a drip polygon drawn
//! inside a regular polygon yields drip-classified points in the
//! overlap, never double-counted regular area.

use glam::DVec2;

use crate::store::Shape;
use crate::types::ZoneKind;

/// Classify a point against the full shape list.
pub fn classify(p: DVec2, shapes: &[Shape]) -> Option<ZoneKind> {
    shapes
        .iter()
        .filter(|shape| shape.contains(p))
        .map(|shape| shape.kind)
        .max_by_key(|kind| kind.priority())
}

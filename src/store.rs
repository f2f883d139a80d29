//! Ordered zone storage and the shape lifecycle.
//!
//! Shapes are immutable once created (deletion aside) and owned
//! exclusively by the store. Every mutation bumps a version counter that
//! downstream caches key their memoization on.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{point_in_ring, ring_area, ring_is_closed};
use crate::log::debug;
use crate::types::ZoneKind;

/// A closed polygon tagged with a zone kind.
///
/// Invariant: `points` holds at least 3 unique vertices plus the
/// repeated closing point. Rings that fail this are never admitted into
/// area or classification logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub points: Vec<DVec2>,
    pub kind: ZoneKind,
    /// Shoelace area, cached at construction.
    pub area: f64,
}

impl Shape {
    /// Build a shape from a closed ring, caching its shoelace area.
    /// Returns `None` for rings violating the closed-ring invariant.
    pub fn from_ring(points: Vec<DVec2>, kind: ZoneKind) -> Option<Self> {
        if !ring_is_closed(&points) {
            return None;
        }
        let area = ring_area(&points);
        Some(Self { points, kind, area })
    }

    pub fn contains(&self, p: DVec2) -> bool {
        point_in_ring(p, &self.points)
    }
}

/// Ordered collection of closed shapes.
#[derive(Debug, Clone, Default)]
pub struct ZoneStore {
    shapes: Vec<Shape>,
    version: u64,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted shapes, silently dropping any
    /// whose ring no longer satisfies the closed-ring invariant.
    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        let admitted: Vec<Shape> = shapes
            .into_iter()
            .filter(|shape| ring_is_closed(&shape.points))
            .collect();
        Self {
            shapes: admitted,
            version: 0,
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Monotonic counter bumped on every mutation; the memoization key
    /// for derived region state.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn push(&mut self, shape: Shape) {
        debug!("appending {} shape, area {:.1} px^2", shape.kind, shape.area);
        self.shapes.push(shape);
        self.version += 1;
    }

    /// Remove the first-inserted shape containing `p`.
    ///
    /// Exactly one shape is removed per call even when several
    /// overlapping shapes contain the point. Removal order is insertion
    /// order, not paint order.
    pub fn remove_at(&mut self, p: DVec2) -> Option<Shape> {
        let index = self.shapes.iter().position(|shape| shape.contains(p))?;
        self.version += 1;
        Some(self.shapes.remove(index))
    }

    pub fn clear(&mut self) {
        if !self.shapes.is_empty() {
            self.shapes.clear();
            self.version += 1;
        }
    }
}

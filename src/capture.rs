//! Polygon capture state machine.
//!
//! Accumulates committed pointer positions into an open polygon and
//! closes it when a commit lands within the snap radius of the first
//! vertex. The provisional cursor is tracked separately from committed
//! vertices so the rendering collaborator can preview the next edge
//! without mutating confirmed state.

use glam::DVec2;

use crate::defaults::SNAP_RADIUS_PX;
use crate::geometry::{distance, distinct_vertices};
use crate::log::debug;

/// Minimum distinct confirmed vertices before the snap-to-close
/// condition is ever evaluated. Guarantees every emitted ring has 3
/// unique vertices; repeated commits on the same point do not count.
const MIN_VERTICES_TO_CLOSE: usize = 3;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Capture {
    #[default]
    Idle,
    Drawing {
        /// Committed vertices, in commit order.
        vertices: Vec<DVec2>,
        /// Live provisional cursor, cleared on pointer-leave.
        cursor: Option<DVec2>,
    },
}

/// Outcome of committing a point.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// First vertex of a new polygon.
    Started,
    /// Another vertex appended to the open polygon.
    Extended,
    /// The polygon closed: a ring whose last point repeats the first.
    Closed(Vec<DVec2>),
}

impl Capture {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Capture::Drawing { .. })
    }

    /// Committed vertices plus the live cursor, for edge preview.
    /// `None` while idle.
    pub fn preview(&self) -> Option<(&[DVec2], Option<DVec2>)> {
        match self {
            Capture::Idle => None,
            Capture::Drawing { vertices, cursor } => Some((vertices, *cursor)),
        }
    }

    /// Track the provisional cursor position. Confirmed vertices are
    /// untouched.
    pub fn hover(&mut self, p: DVec2) {
        if let Capture::Drawing { cursor, .. } = self {
            *cursor = Some(p);
        }
    }

    /// Pointer left the canvas: drop only the live cursor. Drawing
    /// resumes on re-entry with all committed vertices intact.
    pub fn leave(&mut self) {
        if let Capture::Drawing { cursor, .. } = self {
            *cursor = None;
        }
    }

    /// Abandon the in-progress polygon entirely.
    pub fn cancel(&mut self) {
        *self = Capture::Idle;
    }

    /// Commit a point: start a polygon, extend it, or close it.
    ///
    /// Closure requires at least [`MIN_VERTICES_TO_CLOSE`] distinct
    /// confirmed vertices and a commit within the snap radius of the
    /// first vertex. The returned ring repeats the first vertex as its
    /// closing point.
    pub fn commit(&mut self, p: DVec2) -> Commit {
        match self {
            Capture::Idle => {
                *self = Capture::Drawing {
                    vertices: vec![p],
                    cursor: None,
                };
                Commit::Started
            }
            Capture::Drawing { vertices, .. } => {
                let snaps = distinct_vertices(vertices) >= MIN_VERTICES_TO_CLOSE
                    && distance(p, vertices[0]) <= SNAP_RADIUS_PX;
                if snaps {
                    let mut ring = std::mem::take(vertices);
                    ring.push(ring[0]);
                    debug!("polygon closed with {} vertices", ring.len() - 1);
                    *self = Capture::Idle;
                    Commit::Closed(ring)
                } else {
                    vertices.push(p);
                    Commit::Extended
                }
            }
        }
    }
}

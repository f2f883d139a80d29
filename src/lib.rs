//! Irrigation-zone geometry engine.
//!
//! Turns pointer gestures over a plan image into classified zone
//! polygons, resolves their overlaps by kind priority, segments the
//! canvas into connected same-kind regions, and reports per-kind areas
//! in real-world units once a ruler calibration exists. The engine never
//! paints anything itself: it produces the data a rendering collaborator
//! draws from.
//!
//! All mutable state lives in an explicit [`Session`]; there are no
//! globals. Persistence goes through the [`KeyValueStore`] trait so
//! hosts choose their own backend.

pub mod aggregate;
pub mod capture;
pub mod classify;
pub mod defaults;
pub mod errors;
pub mod geometry;
pub mod log;
pub mod persist;
pub mod ruler;
pub mod segment;
pub mod session;
pub mod store;
pub mod types;

pub use aggregate::{AreaReport, ZoneTotals};
pub use capture::{Capture, Commit};
pub use errors::{CalibrationError, PersistError};
pub use persist::{KeyValueStore, MemoryStore};
pub use ruler::Ruler;
pub use segment::{Region, Segmentation};
pub use session::{Session, SessionEvent};
pub use store::{Shape, ZoneStore};
pub use types::{Calibration, CanvasSize, PixelRatio, RealArea, Tool, Unit, ZoneKind};

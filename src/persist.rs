//! Key-value persistence of session state.
//!
//! Four independent keys carry shapes, ruler, pixel ratio and canvas
//! dimensions. Loading is lenient: each key is recovered on its own, and
//! a missing or malformed entry degrades that one field to its default
//! instead of failing the whole restore.

use serde_json::Error as JsonError;

use crate::errors::PersistError;
use crate::log::warn;
use crate::ruler::Ruler;
use crate::session::Session;
use crate::store::Shape;
use crate::types::{CanvasSize, PixelRatio};

pub const KEY_SHAPES: &str = "shapes";
pub const KEY_RULER: &str = "ruler";
pub const KEY_PIXEL_RATIO: &str = "pixel_ratio";
pub const KEY_CANVAS: &str = "canvas";

/// String-keyed storage backend. Implementations decide where the bytes
/// live; the engine only ever reads and writes whole values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-memory backend, used in tests and as the no-persistence fallback.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Write the session's durable state under the four well-known keys.
///
/// Absent state removes its key, so a cleared session leaves no stale
/// entries behind. The pixel ratio is stored as a plain numeric string,
/// not JSON, matching how it is read back.
pub fn save(session: &Session, store: &mut dyn KeyValueStore) -> Result<(), PersistError> {
    store.set(KEY_SHAPES, encode(KEY_SHAPES, &session.shapes())?);

    match session.ruler() {
        Some(ruler) => store.set(KEY_RULER, encode(KEY_RULER, ruler)?),
        None => store.remove(KEY_RULER),
    }

    match session.calibration() {
        Some(calibration) => store.set(KEY_PIXEL_RATIO, calibration.ratio.get().to_string()),
        None => store.remove(KEY_PIXEL_RATIO),
    }

    match session.canvas_size() {
        Some(canvas) => store.set(KEY_CANVAS, encode(KEY_CANVAS, &canvas)?),
        None => store.remove(KEY_CANVAS),
    }

    Ok(())
}

/// Rebuild a session from the store, recovering each key independently.
pub fn load(store: &dyn KeyValueStore) -> Session {
    let shapes: Vec<Shape> = decode_or_default(store, KEY_SHAPES);

    let ruler: Option<Ruler> = store
        .get(KEY_RULER)
        .and_then(|raw| drop_malformed(KEY_RULER, serde_json::from_str(&raw)));

    let ratio = store.get(KEY_PIXEL_RATIO).and_then(|raw| {
        let parsed: Result<f64, _> = raw.trim().parse();
        match parsed.ok().map(PixelRatio::try_new) {
            Some(Ok(ratio)) => Some(ratio),
            _ => {
                warn!("discarding malformed {KEY_PIXEL_RATIO} entry: {raw:?}");
                None
            }
        }
    });

    let canvas: Option<CanvasSize> = store
        .get(KEY_CANVAS)
        .and_then(|raw| drop_malformed(KEY_CANVAS, serde_json::from_str(&raw)));

    Session::restore(shapes, ruler, ratio, canvas)
}

fn encode<T: serde::Serialize>(key: &'static str, value: &T) -> Result<String, PersistError> {
    serde_json::to_string(value).map_err(|source| PersistError::Encode { key, source })
}

fn decode_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    store
        .get(key)
        .and_then(|raw| drop_malformed(key, serde_json::from_str(&raw)))
        .unwrap_or_default()
}

fn drop_malformed<T>(key: &str, decoded: Result<T, JsonError>) -> Option<T> {
    match decoded {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("discarding malformed {key} entry: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Tool, Unit};
    use glam::dvec2;

    fn session_with_state() -> Session {
        let mut session = Session::new();
        session.set_canvas_size(Some(CanvasSize::new(200.0, 150.0)));

        session.set_tool(Tool::Drip);
        session.pointer_released(dvec2(0.0, 0.0));
        session.pointer_released(dvec2(100.0, 0.0));
        session.pointer_released(dvec2(100.0, 100.0));
        session.pointer_released(dvec2(0.0, 0.0));

        session.set_tool(Tool::Ruler);
        session.pointer_pressed(dvec2(0.0, 0.0));
        session.pointer_released(dvec2(50.0, 0.0));
        session.calibrate("5", Unit::Feet).unwrap();
        session
    }

    #[test]
    fn save_load_round_trip() {
        let mut kv = MemoryStore::new();
        save(&session_with_state(), &mut kv).unwrap();

        let restored = load(&kv);
        assert_eq!(restored.shapes().len(), 1);
        assert_eq!(restored.shapes()[0].area, 5_000.0);
        assert_eq!(restored.canvas_size(), Some(CanvasSize::new(200.0, 150.0)));
        assert_eq!(restored.ruler().unwrap().real_length, 5.0);

        let calibration = restored.calibration().unwrap();
        assert_eq!(calibration.ratio.get(), 0.1);
        assert_eq!(calibration.unit, Unit::Feet);
    }

    #[test]
    fn load_from_empty_store_is_a_fresh_session() {
        let restored = load(&MemoryStore::new());
        assert!(restored.shapes().is_empty());
        assert!(restored.ruler().is_none());
        assert_eq!(restored.calibration(), None);
        assert_eq!(restored.canvas_size(), None);
    }

    #[test]
    fn malformed_shapes_degrade_to_empty_without_losing_other_keys() {
        let mut kv = MemoryStore::new();
        save(&session_with_state(), &mut kv).unwrap();
        kv.set(KEY_SHAPES, "{not json".to_string());

        let restored = load(&kv);
        assert!(restored.shapes().is_empty());
        assert!(restored.ruler().is_some());
        assert!(restored.calibration().is_some());
    }

    #[test]
    fn malformed_ratio_is_discarded() {
        let mut kv = MemoryStore::new();
        kv.set(KEY_PIXEL_RATIO, "zero point one".to_string());
        assert_eq!(load(&kv).calibration(), None);

        kv.set(KEY_PIXEL_RATIO, "-0.5".to_string());
        assert_eq!(load(&kv).calibration(), None);
    }

    #[test]
    fn ratio_is_stored_as_a_plain_numeric_string() {
        let mut kv = MemoryStore::new();
        save(&session_with_state(), &mut kv).unwrap();
        assert_eq!(kv.get(KEY_PIXEL_RATIO).as_deref(), Some("0.1"));
    }

    #[test]
    fn absent_state_removes_stale_keys() {
        let mut kv = MemoryStore::new();
        save(&session_with_state(), &mut kv).unwrap();
        assert!(kv.get(KEY_RULER).is_some());

        save(&Session::new(), &mut kv).unwrap();
        assert!(kv.get(KEY_RULER).is_none());
        assert!(kv.get(KEY_PIXEL_RATIO).is_none());
        assert!(kv.get(KEY_CANVAS).is_none());
        assert_eq!(kv.get(KEY_SHAPES).as_deref(), Some("[]"));
    }

    #[test]
    fn ratio_without_ruler_falls_back_to_default_unit() {
        let mut kv = MemoryStore::new();
        kv.set(KEY_PIXEL_RATIO, "0.25".to_string());

        let restored = load(&kv);
        let calibration = restored.calibration().unwrap();
        assert_eq!(calibration.ratio.get(), 0.25);
        assert_eq!(calibration.unit, Unit::Meters);
    }
}

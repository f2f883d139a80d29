//! Error types for calibration and persistence.
//!
//! Everything here is recoverable: calibration errors send the user back
//! to the prompt, and persistence errors degrade to empty state.

use thiserror::Error;

/// Errors raised while turning a ruler segment into a pixel ratio
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("ruler length is not a number: {input:?}")]
    InvalidLength { input: String },

    #[error("ruler length must be a positive finite number")]
    NonPositiveLength,

    /// The ruler endpoints coincide, so no finite ratio exists.
    #[error("ruler has zero pixel length")]
    DegenerateRuler,

    #[error("no ruler has been placed")]
    NoRuler,
}

/// Errors raised while writing session state to a key-value store
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

//! Error types for the analysis pipeline

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpectrumError {
    /// The frame buffer no longer matches the planned transform length.
    #[error("transform length mismatch: planned {expected}, buffer holds {actual}")]
    TransformLength { expected: usize, actual: usize },

    /// The half-spectrum is too short to fill the requested bar count.
    #[error("spectrum of {len} bins cannot fill {bars} bars")]
    ShortSpectrum { len: usize, bars: usize },

    /// A curve query fell outside the valid position range.
    #[error("curve position {pos} outside [0, {max})")]
    CurveRange { pos: f64, max: f64 },
}

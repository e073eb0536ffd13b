//! Spectrum analysis core for VIZOR
//!
//! Turns transform output into per-bar display state: bin reduction,
//! log/linear calibration, temporal shaping with peak hold, automatic
//! gain control, cyclic color mapping, and curve interpolation.

mod agc;
mod calibrate;
pub mod curve;
mod error;
mod frame;
mod gradient;
pub mod reducer;
mod shaper;

pub use agc::{AutoGain, LOG_SCALE_MAX, LOG_SCALE_MIN};
pub use calibrate::{Calibration, ENERGY_EPSILON, MAG_CEILING, MAG_FLOOR};
pub use error::SpectrumError;
pub use frame::{SpectralFrame, FFT_SIZE};
pub use gradient::{advance_phase, Gradient, Rgb, GRADIENT_LEN};
pub use shaper::{Shaper, SmoothingMode};

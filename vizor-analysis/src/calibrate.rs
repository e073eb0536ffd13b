//! Log/linear display calibration

/// Floor for energies entering the logarithm. Keeps silence finite.
pub const ENERGY_EPSILON: f64 = 1e-12;

/// Display magnitude floor applied at render time.
pub const MAG_FLOOR: f64 = 3.0;

/// Display magnitude ceiling. Also the AGC's vertical extent and the color
/// mapper's top band.
pub const MAG_CEILING: f64 = 500.0;

/// Two-parameter empirical display curve. The logarithmic scale doubles as
/// the AGC's control variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub linear: f64,
    pub logarithmic: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            linear: 160.0,
            logarithmic: 1.1e-8,
        }
    }
}

impl Calibration {
    /// Map a raw bar energy onto the display scale.
    ///
    /// Energies at or below the epsilon floor land on a deep fixed floor
    /// instead of producing -inf or NaN.
    pub fn magnitude(&self, energy: f64) -> f64 {
        (energy.max(ENERGY_EPSILON) * self.logarithmic).log10() * self.linear
    }
}

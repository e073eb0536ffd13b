//! Automatic gain control over the logarithmic calibration scale

/// Frames in the running-average window.
const CYCLES: f64 = 20.0;

/// Engaged frames between threshold evaluations.
const EVAL_INTERVAL: u32 = 100;

/// Multiplicative correction step.
const STEP: f64 = 1.1;

/// Bounds for the logarithmic calibration scale.
pub const LOG_SCALE_MIN: f64 = 1e-12;
pub const LOG_SCALE_MAX: f64 = 1e-4;

const LOW_BAND: f64 = 0.50;
const HIGH_BAND: f64 = 0.70;
const CLIP_BAND: f64 = 0.85;

/// Closed-loop controller keeping the displayed maximum inside a target
/// band of the vertical extent.
///
/// Corrections react to the running average, not single frames, and only
/// every `EVAL_INTERVAL`th engaged frame is evaluated. The asymmetric
/// raise/lower thresholds stop the loop from oscillating around one edge.
#[derive(Debug, Clone)]
pub struct AutoGain {
    average: f64,
    engaged: u32,
}

impl AutoGain {
    pub fn new(height: f64) -> Self {
        Self {
            average: height * LOW_BAND,
            engaged: 0,
        }
    }

    /// Observe one render frame's maximum displayed magnitude and decide
    /// whether the logarithmic scale should change. Returns the corrected
    /// scale when a rescale fires.
    pub fn advance(&mut self, max_magnitude: f64, height: f64, log_scale: f64) -> Option<f64> {
        if !(max_magnitude > 1.0 || max_magnitude > height * CLIP_BAND) {
            return None;
        }

        self.average = max_magnitude / CYCLES + self.average * (1.0 - 1.0 / CYCLES);
        self.engaged = self.engaged.wrapping_add(1);
        if self.engaged % EVAL_INTERVAL != 0 {
            return None;
        }

        if self.average < height * LOW_BAND {
            // Signal too weak: raise gain.
            self.average = height * LOW_BAND;
            if log_scale < LOG_SCALE_MAX {
                let next = (log_scale * STEP).min(LOG_SCALE_MAX);
                tracing::debug!(log_scale = next, "auto gain raised");
                return Some(next);
            }
        } else if self.average > height * HIGH_BAND || max_magnitude > height * CLIP_BAND {
            // Signal clipping the display: lower gain.
            self.average = height * LOW_BAND;
            if log_scale > LOG_SCALE_MIN {
                let next = (log_scale / STEP).max(LOG_SCALE_MIN);
                tracing::debug!(log_scale = next, "auto gain lowered");
                return Some(next);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: f64 = 500.0;

    fn run(agc: &mut AutoGain, max: f64, frames: usize, mut scale: f64) -> f64 {
        for _ in 0..frames {
            if let Some(next) = agc.advance(max, HEIGHT, scale) {
                scale = next;
            }
        }
        scale
    }

    #[test]
    fn test_sustained_clipping_lowers_gain() {
        let mut agc = AutoGain::new(HEIGHT);
        let scale = run(&mut agc, HEIGHT * 0.9, 100, 1.1e-8);
        assert!(scale < 1.1e-8);
    }

    #[test]
    fn test_sustained_weak_signal_raises_gain() {
        let mut agc = AutoGain::new(HEIGHT);
        let scale = run(&mut agc, 5.0, 100, 1.1e-8);
        assert!(scale > 1.1e-8);
    }

    #[test]
    fn test_no_correction_before_evaluation_interval() {
        let mut agc = AutoGain::new(HEIGHT);
        let scale = run(&mut agc, HEIGHT * 0.9, 99, 1.1e-8);
        assert_eq!(scale, 1.1e-8);
    }

    #[test]
    fn test_disengaged_below_unity() {
        let mut agc = AutoGain::new(HEIGHT);
        let scale = run(&mut agc, 0.5, 1000, 1.1e-8);
        assert_eq!(scale, 1.1e-8);
    }

    #[test]
    fn test_scale_clamped_to_bounds() {
        let mut agc = AutoGain::new(HEIGHT);
        let scale = run(&mut agc, HEIGHT * 0.9, 100, LOG_SCALE_MIN * 1.05);
        assert_eq!(scale, LOG_SCALE_MIN);

        let mut agc = AutoGain::new(HEIGHT);
        let scale = run(&mut agc, 5.0, 100, LOG_SCALE_MAX);
        assert_eq!(scale, LOG_SCALE_MAX);
    }

    #[test]
    fn test_in_band_signal_leaves_gain_alone() {
        let mut agc = AutoGain::new(HEIGHT);
        // Max sits between the 50% and 70% thresholds: neither branch fires.
        let scale = run(&mut agc, HEIGHT * 0.6, 500, 1.1e-8);
        assert_eq!(scale, 1.1e-8);
    }
}

//! Temporal smoothing and peak hold, applied once per processed audio frame

/// Selectable smoothing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingMode {
    /// Both attack and release damped by the smoothing factor.
    #[default]
    Normal,
    /// Instant attack, damped release.
    DecayOnly,
}

impl SmoothingMode {
    pub fn display_name(self) -> &'static str {
        match self {
            SmoothingMode::Normal => "NORMAL",
            SmoothingMode::DecayOnly => "DECAY",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            SmoothingMode::Normal => SmoothingMode::DecayOnly,
            SmoothingMode::DecayOnly => SmoothingMode::Normal,
        }
    }
}

/// Per-frame transition rules for one bar.
#[derive(Debug, Clone, Copy)]
pub struct Shaper {
    pub smoothing: f64,
    pub mode: SmoothingMode,
    pub peak_decay: f64,
}

impl Shaper {
    /// Next displayed value given the previous value and a fresh calibrated
    /// magnitude.
    pub fn advance(&self, prev: f64, magnitude: f64) -> f64 {
        match self.mode {
            SmoothingMode::DecayOnly if magnitude > prev => magnitude,
            _ => prev * self.smoothing + magnitude * (1.0 - self.smoothing),
        }
    }

    /// Next peak given the previous peak and the freshly displayed value.
    /// Rises instantly, decays linearly, and is stored unfloored; the
    /// render side floors it at the display floor.
    pub fn advance_peak(&self, peak: f64, displayed: f64) -> f64 {
        if displayed > peak {
            displayed
        } else {
            (peak - self.peak_decay).max(displayed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shaper(mode: SmoothingMode, smoothing: f64) -> Shaper {
        Shaper {
            smoothing,
            mode,
            peak_decay: 2.0,
        }
    }

    #[test]
    fn test_normal_mode_converges_monotonically_from_below() {
        let s = shaper(SmoothingMode::Normal, 0.7);
        let target: f64 = 100.0;
        let mut v = 0.0;
        let mut frames = 0;
        while (target - v).abs() > 1e-6 {
            let next = s.advance(v, target);
            assert!(next > v && next <= target);
            v = next;
            frames += 1;
            assert!(frames < 200, "did not converge");
        }
    }

    #[test]
    fn test_normal_mode_converges_monotonically_from_above() {
        let s = shaper(SmoothingMode::Normal, 0.7);
        let mut v = 300.0;
        for _ in 0..100 {
            let next = s.advance(v, 50.0);
            assert!(next < v && next >= 50.0);
            v = next;
        }
        assert!((v - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_decay_only_attack_is_instant() {
        let s = shaper(SmoothingMode::DecayOnly, 0.7);
        assert_eq!(s.advance(10.0, 250.0), 250.0);
    }

    #[test]
    fn test_decay_only_release_lands_between_input_and_previous() {
        let s = shaper(SmoothingMode::DecayOnly, 0.7);
        let next = s.advance(200.0, 50.0);
        assert!(next > 50.0 && next < 200.0);
    }

    #[test]
    fn test_peak_rises_instantly_and_decays_linearly() {
        let s = shaper(SmoothingMode::Normal, 0.7);
        let mut peak = s.advance_peak(0.0, 100.0);
        assert_eq!(peak, 100.0);

        let mut last = peak;
        for _ in 0..10 {
            peak = s.advance_peak(peak, 3.0);
            assert!(peak <= last);
            assert_eq!(peak, (last - 2.0).max(3.0));
            last = peak;
        }
    }

    #[test]
    fn test_peak_never_falls_below_displayed_value() {
        let s = shaper(SmoothingMode::Normal, 0.7);
        let peak = s.advance_peak(10.0, 9.5);
        assert_eq!(peak, 9.5);
    }
}

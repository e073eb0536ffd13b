//! Command definitions for VIZOR

/// Adjustment direction for a directional event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Signed step multiplier.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

/// Commands that can be dispatched from input. Each adjustment is a
/// discrete increment/decrement; bounds are enforced by the parameter
/// setters, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Shaping
    AdjustSmoothing(Direction),
    CycleSmoothingMode,
    AdjustPeakDecay(Direction),
    TogglePeaks,

    // Reduction
    AdjustBars(Direction),
    AdjustFreqCeiling(Direction),

    // Calibration
    AdjustLinearScale(Direction),
    AdjustLogScale(Direction),
    ToggleAutoGain,

    // Presentation
    AdjustColorRate(Direction),
    ToggleCurve,

    // UI
    ToggleHelp,
    Quit,
}

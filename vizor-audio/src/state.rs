//! Shared spectrum state - the one object all three actors touch

use parking_lot::Mutex;
use vizor_analysis::{
    AutoGain, Calibration, Shaper, SmoothingMode, GRADIENT_LEN, LOG_SCALE_MAX, LOG_SCALE_MIN,
    MAG_CEILING,
};

pub const BARS_MIN: usize = 1;
pub const BARS_MAX: usize = 2048;
pub const SMOOTHING_MAX: f64 = 0.95;
pub const CEILING_MIN: f64 = 200.0;
pub const CEILING_MAX: f64 = 20_000.0;
pub const PEAK_DECAY_MIN: f64 = 0.1;
pub const PEAK_DECAY_MAX: f64 = 50.0;
pub const COLOR_RATE_MAX: f64 = 64.0;
pub const LINEAR_SCALE_MIN: f64 = 1.0;
pub const LINEAR_SCALE_MAX: f64 = 1000.0;

/// Every tunable of the pipeline. All setters clamp silently to the
/// documented bounds; out-of-range requests are never errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumParams {
    pub bars: usize,
    pub freq_ceiling: f64,
    pub smoothing: f64,
    pub mode: SmoothingMode,
    pub peak_decay: f64,
    pub peaks: bool,
    pub auto_gain: bool,
    pub curve: bool,
    pub calibration: Calibration,
    pub color_rate: f64,
    pub color_offset: f64,
    pub color_shading: f64,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            bars: 30,
            freq_ceiling: 2000.0,
            smoothing: 0.33,
            mode: SmoothingMode::Normal,
            peak_decay: 2.0,
            peaks: true,
            auto_gain: true,
            curve: false,
            calibration: Calibration::default(),
            color_rate: 2.0,
            color_offset: 256.0,
            color_shading: 1.0,
        }
    }
}

impl SpectrumParams {
    pub fn set_bars(&mut self, bars: usize) {
        self.bars = bars.clamp(BARS_MIN, BARS_MAX);
    }

    pub fn set_smoothing(&mut self, smoothing: f64) {
        self.smoothing = smoothing.clamp(0.0, SMOOTHING_MAX);
    }

    pub fn set_freq_ceiling(&mut self, hz: f64) {
        self.freq_ceiling = hz.clamp(CEILING_MIN, CEILING_MAX);
    }

    pub fn set_peak_decay(&mut self, decay: f64) {
        self.peak_decay = decay.clamp(PEAK_DECAY_MIN, PEAK_DECAY_MAX);
    }

    pub fn set_color_rate(&mut self, rate: f64) {
        self.color_rate = rate.clamp(0.0, COLOR_RATE_MAX);
    }

    pub fn set_color_offset(&mut self, offset: f64) {
        self.color_offset = offset.clamp(0.0, (GRADIENT_LEN - 1) as f64);
    }

    pub fn set_color_shading(&mut self, shading: f64) {
        self.color_shading = shading.clamp(0.0, 4.0);
    }

    pub fn set_linear_scale(&mut self, scale: f64) {
        self.calibration.linear = scale.clamp(LINEAR_SCALE_MIN, LINEAR_SCALE_MAX);
    }

    pub fn set_log_scale(&mut self, scale: f64) {
        self.calibration.logarithmic = scale.clamp(LOG_SCALE_MIN, LOG_SCALE_MAX);
    }

    fn shaper(&self) -> Shaper {
        Shaper {
            smoothing: self.smoothing,
            mode: self.mode,
            peak_decay: self.peak_decay,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    magnitudes: Vec<f64>,
    peaks: Vec<f64>,
    params: SpectrumParams,
}

/// The mutex-guarded spectrum state shared by the capture callback, the
/// render loop, and the input dispatch.
///
/// The lock is an implementation detail of the accessor methods: every
/// read-modify-write happens inside one scoped acquisition, and none of
/// them spans the transform, device I/O, or drawing.
pub struct SharedSpectrum {
    inner: Mutex<State>,
}

impl SharedSpectrum {
    pub fn new(params: SpectrumParams) -> Self {
        Self {
            inner: Mutex::new(State {
                magnitudes: Vec::with_capacity(params.bars),
                peaks: Vec::with_capacity(params.bars),
                params,
            }),
        }
    }

    /// Copy of the current parameters.
    pub fn params(&self) -> SpectrumParams {
        self.inner.lock().params
    }

    /// Fold one frame of calibrated magnitudes into the displayed state.
    ///
    /// The first frame after a reset seeds magnitudes and peaks directly,
    /// with no smoothing. A frame whose length no longer matches the
    /// current bar count raced a bar-count change and is dropped.
    pub fn ingest(&self, calibrated: &[f64]) {
        let mut state = self.inner.lock();
        if calibrated.len() != state.params.bars {
            return;
        }
        if state.magnitudes.is_empty() {
            state.magnitudes.extend_from_slice(calibrated);
            state.peaks.extend_from_slice(calibrated);
            return;
        }

        let shaper = state.params.shaper();
        let track_peaks = state.params.peaks;
        let State {
            magnitudes, peaks, ..
        } = &mut *state;
        for ((value, peak), &magnitude) in
            magnitudes.iter_mut().zip(peaks.iter_mut()).zip(calibrated)
        {
            let next = shaper.advance(*value, magnitude);
            *value = next;
            if track_peaks {
                *peak = shaper.advance_peak(*peak, next);
            }
        }
    }

    /// Copy magnitudes, peaks, and parameters into a reusable render-side
    /// buffer.
    pub fn snapshot(&self, out: &mut Snapshot) {
        let state = self.inner.lock();
        out.magnitudes.clone_from(&state.magnitudes);
        out.peaks.clone_from(&state.peaks);
        out.params = state.params;
    }

    /// Mutate parameters through their clamping setters.
    ///
    /// A bar-count change clears both value sequences under the same lock
    /// acquisition, so no reader can observe bars of the old length; the
    /// next processed frame reseeds them.
    pub fn update<F: FnOnce(&mut SpectrumParams)>(&self, apply: F) -> SpectrumParams {
        let mut state = self.inner.lock();
        let bars_before = state.params.bars;
        apply(&mut state.params);
        if state.params.bars != bars_before {
            state.magnitudes.clear();
            state.peaks.clear();
        }
        state.params
    }

    /// One AGC observation: read this frame's maximum displayed magnitude
    /// and apply the rescale decision to the calibration, all under one
    /// lock.
    pub fn apply_auto_gain(&self, agc: &mut AutoGain) {
        let mut state = self.inner.lock();
        if !state.params.auto_gain || state.magnitudes.is_empty() {
            return;
        }
        let max = state.magnitudes.iter().fold(f64::MIN, |a, &b| a.max(b));
        if let Some(scale) = agc.advance(max, MAG_CEILING, state.params.calibration.logarithmic) {
            state.params.calibration.logarithmic = scale;
        }
    }
}

/// Render-side copy of the shared state, refilled once per frame.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub magnitudes: Vec<f64>,
    pub peaks: Vec<f64>,
    pub params: SpectrumParams,
}

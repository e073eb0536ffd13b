//! Per-chunk analysis pipeline - PCM in, shared spectrum state out

use std::sync::Arc;

use tracing::{info, warn};
use vizor_analysis::{reducer, SpectralFrame};

use crate::capture::CaptureSink;
use crate::state::SharedSpectrum;

/// The one implementation of the capture capability interface.
///
/// Owns the reusable transform frame and scratch vectors, so the capture
/// path performs no per-frame allocation: buffers are reset, not
/// reallocated. The state lock is taken twice per chunk, briefly - once to
/// read parameters, once to store the shaped result - and never spans the
/// transform.
pub struct AnalysisPipeline {
    state: Arc<SharedSpectrum>,
    frame: SpectralFrame,
    energies: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl AnalysisPipeline {
    pub fn new(state: Arc<SharedSpectrum>) -> Self {
        let bars = state.params().bars;
        Self {
            state,
            frame: SpectralFrame::new(),
            energies: Vec::with_capacity(bars),
            magnitudes: Vec::with_capacity(bars),
        }
    }

    fn process_chunk(&mut self, samples: &[i16]) {
        self.frame.load(samples);
        if let Err(err) = self.frame.forward() {
            warn!(%err, "transform failed, skipping frame");
            return;
        }

        let params = self.state.params();
        if let Err(err) = reducer::reduce(
            self.frame.half_spectrum(),
            params.bars,
            params.freq_ceiling,
            &mut self.energies,
        ) {
            warn!(%err, "bin reduction failed, skipping frame");
            return;
        }

        self.magnitudes.clear();
        self.magnitudes
            .extend(self.energies.iter().map(|&e| params.calibration.magnitude(e)));
        self.state.ingest(&self.magnitudes);
    }
}

impl CaptureSink for AnalysisPipeline {
    fn on_start(&mut self) -> bool {
        info!("capture started");
        true
    }

    fn on_samples(&mut self, samples: &[i16]) -> bool {
        self.process_chunk(samples);
        true
    }

    fn on_stop(&mut self) {
        info!("capture stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Snapshot, SpectrumParams};
    use std::f64::consts::PI;
    use vizor_analysis::{AutoGain, SmoothingMode, FFT_SIZE, MAG_CEILING};

    fn pipeline(params: SpectrumParams) -> (AnalysisPipeline, Arc<SharedSpectrum>) {
        let state = Arc::new(SharedSpectrum::new(params));
        (AnalysisPipeline::new(state.clone()), state)
    }

    fn sine_chunk(freq_bins: f64, amplitude: f64) -> Vec<i16> {
        (0..FFT_SIZE)
            .map(|i| {
                (amplitude * (2.0 * PI * freq_bins * i as f64 / FFT_SIZE as f64).sin()) as i16
            })
            .collect()
    }

    #[test]
    fn test_tone_populates_all_bars() {
        let (mut pipe, state) = pipeline(SpectrumParams::default());
        assert!(pipe.on_samples(&sine_chunk(12.0, 20_000.0)));

        let mut snap = Snapshot::default();
        state.snapshot(&mut snap);
        assert_eq!(snap.magnitudes.len(), snap.params.bars);
        assert!(snap.magnitudes.iter().all(|m| m.is_finite()));
        assert!(snap.peaks.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_silence_settles_to_a_fixed_floor_without_rescale() {
        let (mut pipe, state) = pipeline(SpectrumParams::default());
        let silence = vec![0i16; FFT_SIZE];
        let mut agc = AutoGain::new(MAG_CEILING);
        let scale_before = state.params().calibration.logarithmic;

        for _ in 0..10 {
            pipe.on_samples(&silence);
            state.apply_auto_gain(&mut agc);
        }

        let mut snap = Snapshot::default();
        state.snapshot(&mut snap);
        let floor = snap.params.calibration.magnitude(0.0);
        assert!(snap.magnitudes.iter().all(|&m| (m - floor).abs() < 1e-9));
        // The settled maximum never exceeds 1, so the AGC never engaged.
        assert_eq!(state.params().calibration.logarithmic, scale_before);
    }

    #[test]
    fn test_burst_then_silence_decays_geometrically() {
        let mut params = SpectrumParams {
            auto_gain: false,
            peaks: false,
            ..SpectrumParams::default()
        };
        params.mode = SmoothingMode::Normal;
        let smoothing = params.smoothing;
        let (mut pipe, state) = pipeline(params);

        pipe.on_samples(&sine_chunk(8.0, 30_000.0));
        let mut snap = Snapshot::default();
        state.snapshot(&mut snap);
        let bar = snap
            .magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();

        let floor = snap.params.calibration.magnitude(0.0);
        let silence = vec![0i16; FFT_SIZE];
        let mut previous = snap.magnitudes[bar];
        for _ in 0..50 {
            pipe.on_samples(&silence);
            state.snapshot(&mut snap);
            let current = snap.magnitudes[bar];
            let expected = previous * smoothing + floor * (1.0 - smoothing);
            assert!((current - expected).abs() < 1e-6);
            previous = current;
        }
        // After 50 geometric steps the bar has all but reached the floor.
        assert!((previous - floor).abs() < 1e-3);
    }

    #[test]
    fn test_bar_count_change_mid_stream_reseeds_cleanly() {
        let (mut pipe, state) = pipeline(SpectrumParams::default());
        pipe.on_samples(&sine_chunk(5.0, 10_000.0));

        state.update(|p| p.set_bars(64));
        pipe.on_samples(&sine_chunk(5.0, 10_000.0));

        let mut snap = Snapshot::default();
        state.snapshot(&mut snap);
        assert_eq!(snap.magnitudes.len(), 64);
        assert_eq!(snap.peaks.len(), 64);
    }

    #[test]
    fn test_short_chunk_is_zero_padded_not_rejected() {
        let (mut pipe, state) = pipeline(SpectrumParams::default());
        assert!(pipe.on_samples(&[1000i16; 128]));

        let mut snap = Snapshot::default();
        state.snapshot(&mut snap);
        assert_eq!(snap.magnitudes.len(), snap.params.bars);
    }
}

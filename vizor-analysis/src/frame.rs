//! Spectral transform framing - the fixed-size complex buffer fed to the FFT

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::SpectrumError;

/// Analysis buffer length. Power of two, required by the transform.
pub const FFT_SIZE: usize = 4096;

/// Reusable transform frame: one pre-allocated complex buffer plus the
/// pre-planned forward FFT that consumes it. Reset by `load`, never
/// reallocated on the capture path.
pub struct SpectralFrame {
    fft: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex<f64>>,
}

impl SpectralFrame {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
        }
    }

    /// Fill the frame from raw 16-bit PCM, zero-padding when the delivered
    /// chunk is shorter than the analysis buffer. Longer chunks are
    /// truncated to the buffer capacity.
    pub fn load(&mut self, samples: &[i16]) {
        let take = samples.len().min(FFT_SIZE);
        for (slot, &sample) in self.buffer.iter_mut().zip(&samples[..take]) {
            *slot = Complex::new(f64::from(sample), 0.0);
        }
        for slot in self.buffer.iter_mut().skip(take) {
            *slot = Complex::new(0.0, 0.0);
        }
    }

    /// Run the forward transform in place.
    ///
    /// The length check guards the planned-transform contract; on failure
    /// the caller skips the frame and keeps the previous displayed state.
    pub fn forward(&mut self) -> Result<(), SpectrumError> {
        if self.buffer.len() != self.fft.len() {
            return Err(SpectrumError::TransformLength {
                expected: self.fft.len(),
                actual: self.buffer.len(),
            });
        }
        self.fft.process(&mut self.buffer);
        Ok(())
    }

    /// The lower half of the transformed spectrum. For real input the upper
    /// half mirrors it and carries no extra information.
    pub fn half_spectrum(&self) -> &[Complex<f64>] {
        &self.buffer[..FFT_SIZE / 2]
    }
}

impl Default for SpectralFrame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_zero_pads_short_chunk() {
        let mut frame = SpectralFrame::new();
        frame.load(&[1000, -1000, 500]);

        assert_eq!(frame.buffer[0].re, 1000.0);
        assert_eq!(frame.buffer[1].re, -1000.0);
        assert_eq!(frame.buffer[2].re, 500.0);
        assert!(frame.buffer[3..].iter().all(|c| c.re == 0.0 && c.im == 0.0));
    }

    #[test]
    fn test_load_overwrites_previous_frame() {
        let mut frame = SpectralFrame::new();
        frame.load(&[i16::MAX; FFT_SIZE]);
        frame.load(&[0; 8]);

        assert!(frame.buffer.iter().all(|c| c.re == 0.0));
    }

    #[test]
    fn test_forward_dc_signal() {
        let mut frame = SpectralFrame::new();
        frame.load(&[100; FFT_SIZE]);
        frame.forward().unwrap();

        // All energy of a constant signal lands in bin 0.
        let half = frame.half_spectrum();
        assert!(half[0].norm_sqr() > 0.0);
        assert!(half[1].norm_sqr() < 1e-3);
    }

    #[test]
    fn test_half_spectrum_length() {
        let frame = SpectralFrame::new();
        assert_eq!(frame.half_spectrum().len(), FFT_SIZE / 2);
    }
}

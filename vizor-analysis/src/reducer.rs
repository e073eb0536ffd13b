//! Frequency-bin to display-bar reduction

use rustfft::num_complex::Complex;

use crate::error::SpectrumError;

/// Upper edge of the range the frequency ceiling is measured against, in Hz.
pub const FULL_RANGE_HZ: f64 = 20_000.0;

/// Collapse a half-spectrum into `bars` non-negative energies.
///
/// The bin span per bar narrows as the frequency ceiling drops, devoting
/// more of the display to low frequencies. Within a chunk only strictly
/// positive squared magnitudes contribute to the average; a silent chunk
/// stays at zero. Reduction stops once `bars` chunks are filled or the
/// source is exhausted, and any unfilled tail is zeroed, so `out` always
/// holds exactly `bars` values.
pub fn reduce(
    spectrum: &[Complex<f64>],
    bars: usize,
    ceiling: f64,
    out: &mut Vec<f64>,
) -> Result<(), SpectrumError> {
    if spectrum.len() < bars {
        return Err(SpectrumError::ShortSpectrum {
            len: spectrum.len(),
            bars,
        });
    }

    let width = chunk_width(spectrum.len(), bars, ceiling);
    out.clear();

    let mut start = 0;
    while out.len() < bars && start < spectrum.len() {
        let end = (start + width).min(spectrum.len());
        let mut sum = 0.0;
        for bin in &spectrum[start..end] {
            let energy = bin.norm_sqr();
            if energy > 0.0 {
                sum += energy;
            }
        }
        out.push(if sum > 0.0 { sum / width as f64 } else { 0.0 });
        start += width;
    }

    out.resize(bars, 0.0);
    Ok(())
}

/// Bins per bar for the given ceiling. Never below 1.
fn chunk_width(len: usize, bars: usize, ceiling: f64) -> usize {
    let per_bar = (len / bars.max(1)) as f64;
    ((per_bar / (FULL_RANGE_HZ / ceiling)) as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum_from(norms: &[f64]) -> Vec<Complex<f64>> {
        norms.iter().map(|&n| Complex::new(n.sqrt(), 0.0)).collect()
    }

    #[test]
    fn test_output_length_always_matches_bars() {
        let spectrum = spectrum_from(&[1.0; 2048]);
        let mut out = Vec::new();
        for bars in [1, 7, 30, 100, 2048] {
            for ceiling in [200.0, 870.0, 5000.0, 20000.0] {
                reduce(&spectrum, bars, ceiling, &mut out).unwrap();
                assert_eq!(out.len(), bars, "bars={bars} ceiling={ceiling}");
                assert!(out.iter().all(|&e| e >= 0.0));
            }
        }
    }

    #[test]
    fn test_silent_chunks_stay_zero() {
        let spectrum = spectrum_from(&[0.0; 256]);
        let mut out = Vec::new();
        reduce(&spectrum, 16, 20000.0, &mut out).unwrap();
        assert!(out.iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_chunk_average_is_order_invariant() {
        let mut norms = vec![0.0; 64];
        norms[..4].copy_from_slice(&[4.0, 1.0, 9.0, 16.0]);
        let mut shuffled = norms.clone();
        shuffled[..4].copy_from_slice(&[16.0, 9.0, 1.0, 4.0]);

        let mut a = Vec::new();
        let mut b = Vec::new();
        reduce(&spectrum_from(&norms), 16, 20000.0, &mut a).unwrap();
        reduce(&spectrum_from(&shuffled), 16, 20000.0, &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_narrow_ceiling_reads_low_bins_only() {
        // Energy only in the top half; a narrow ceiling never reaches it.
        let mut norms = vec![0.0; 2048];
        for n in norms.iter_mut().skip(1024) {
            *n = 100.0;
        }
        let mut out = Vec::new();
        reduce(&spectrum_from(&norms), 30, 870.0, &mut out).unwrap();
        assert!(out.iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_extreme_parameters_keep_width_at_least_one() {
        // 2048 bars over 2048 bins at a narrow ceiling: the raw formula
        // yields a fractional width; the reducer must still make progress.
        let spectrum = spectrum_from(&[1.0; 2048]);
        let mut out = Vec::new();
        reduce(&spectrum, 2048, 200.0, &mut out).unwrap();
        assert_eq!(out.len(), 2048);
    }

    #[test]
    fn test_short_spectrum_is_rejected() {
        let spectrum = spectrum_from(&[1.0; 8]);
        let mut out = Vec::new();
        let err = reduce(&spectrum, 16, 20000.0, &mut out).unwrap_err();
        assert!(matches!(err, SpectrumError::ShortSpectrum { len: 8, bars: 16 }));
    }
}

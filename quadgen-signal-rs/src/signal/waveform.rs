//! Waveform sample-buffer synthesis.
//!
//! [`synthesize`] fills a caller-supplied slice with one period of the
//! requested shape, scaled by an amplitude percentage and re-centered in
//! the 12-bit DAC range. The slice length *is* the sample count; the
//! sampling-clock search in [`sample_rate`](super::sample_rate) decides
//! how long that slice should be.

use core::f32::consts::PI;

use super::error::SignalError;
use super::{FULL_SCALE, MIN_SAMPLE_COUNT};

/// Waveform shapes available on analog channels.
///
/// Digital channels are hardware PWM and permanently [`Square`]; the
/// coordinator never synthesizes a buffer for them.
///
/// [`Square`]: Waveform::Square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

impl Waveform {
    /// The next shape in display order, wrapping Square back to Sine.
    pub fn next(self) -> Self {
        match self {
            Waveform::Sine => Waveform::Triangle,
            Waveform::Triangle => Waveform::Sawtooth,
            Waveform::Sawtooth => Waveform::Square,
            Waveform::Square => Waveform::Sine,
        }
    }

    /// Short label drawn next to the waveform icon on the panel.
    pub fn glyph(self) -> &'static str {
        match self {
            Waveform::Sine => "SIN",
            Waveform::Triangle => "TRI",
            Waveform::Sawtooth => "SAW",
            Waveform::Square => "SQR",
        }
    }
}

/// Fill `samples` with one period of `waveform` at `level_percent`
/// amplitude.
///
/// Every output value lies in `[shift, shift + max_val]` where
/// `max_val = FULL_SCALE * level_percent / 100` and
/// `shift = (FULL_SCALE - max_val) / 2` — a reduced-amplitude waveform
/// sits centered in the output range instead of hugging ground.
///
/// `level_percent` scales amplitude for **all** shapes, including
/// Square: a square wave at 50% swings between 25% and 75% of full
/// scale. Pulse width is a property of the digital (PWM) channels only.
///
/// # Errors
///
/// * [`SignalError::TooFewSamples`] if `samples.len() < 2`.
/// * [`SignalError::InvalidDutyCycle`] if `level_percent` is 0 or
///   above 100.
///
/// The slice is left untouched on error.
pub fn synthesize(
    samples: &mut [u16],
    level_percent: u8,
    waveform: Waveform,
) -> Result<(), SignalError> {
    if samples.len() < MIN_SAMPLE_COUNT {
        return Err(SignalError::TooFewSamples);
    }
    if level_percent == 0 || level_percent > 100 {
        return Err(SignalError::InvalidDutyCycle);
    }

    let count = samples.len();
    let max_val = (FULL_SCALE as u32 * level_percent as u32) / 100;
    let shift = (FULL_SCALE as u32 - max_val) / 2;

    match waveform {
        Waveform::Sine => {
            // The count + 1 denominator keeps the last sample off the
            // exact period boundary, so the wrap back to sample 0 does
            // not repeat the same level.
            let step = (2.0 * PI) / (count + 1) as f32;
            for (i, sample) in samples.iter_mut().enumerate() {
                let level =
                    (((libm::sinf(step * i as f32) + 1.0) * max_val as f32) as u32) >> 1;
                *sample = (level + shift) as u16;
            }
        }
        Waveform::Triangle => {
            let half = (count / 2) as u32;
            for (i, sample) in samples.iter_mut().enumerate() {
                let level = if i as u32 <= half {
                    (max_val * i as u32) / half
                } else {
                    (max_val * (count - i) as u32) / half
                };
                *sample = (level + shift) as u16;
            }
        }
        Waveform::Sawtooth => {
            for (i, sample) in samples.iter_mut().enumerate() {
                let level = (max_val * i as u32) / (count as u32 - 1);
                *sample = (level + shift) as u16;
            }
        }
        Waveform::Square => {
            let half = count / 2;
            for (i, sample) in samples.iter_mut().enumerate() {
                let level = if i < half { max_val } else { 0 };
                *sample = (level + shift) as u16;
            }
        }
    }

    Ok(())
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTS: [usize; 5] = [2, 3, 16, 500, 1024];
    const LEVELS: [u8; 4] = [1, 37, 50, 100];

    fn bounds(level_percent: u8) -> (u16, u16) {
        let max_val = (FULL_SCALE as u32 * level_percent as u32) / 100;
        let shift = (FULL_SCALE as u32 - max_val) / 2;
        (shift as u16, (shift + max_val) as u16)
    }

    // ── Range property ───────────────────────────────────────────────

    #[test]
    fn all_shapes_stay_within_band() {
        let mut buf = [0u16; 1024];
        for waveform in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Sawtooth,
            Waveform::Square,
        ] {
            for &count in &COUNTS {
                for &level in &LEVELS {
                    synthesize(&mut buf[..count], level, waveform).unwrap();
                    let (lo, hi) = bounds(level);
                    assert!(hi <= FULL_SCALE);
                    for (i, &s) in buf[..count].iter().enumerate() {
                        assert!(
                            s >= lo && s <= hi,
                            "{:?} count={} level={} sample[{}]={} outside [{}, {}]",
                            waveform,
                            count,
                            level,
                            i,
                            s,
                            lo,
                            hi
                        );
                    }
                }
            }
        }
    }

    // ── Shape properties ─────────────────────────────────────────────

    #[test]
    fn square_is_high_then_low() {
        let mut buf = [0u16; 64];
        synthesize(&mut buf, 100, Waveform::Square).unwrap();
        let (lo, hi) = bounds(100);
        for &s in &buf[..32] {
            assert_eq!(s, hi);
        }
        for &s in &buf[32..] {
            assert_eq!(s, lo);
        }
    }

    #[test]
    fn square_reduced_level_is_centered() {
        let mut buf = [0u16; 10];
        synthesize(&mut buf, 50, Waveform::Square).unwrap();
        let (lo, hi) = bounds(50);
        assert_eq!(buf[0], hi);
        assert_eq!(buf[9], lo);
        assert!(lo > 0, "reduced-amplitude square must sit above ground");
    }

    #[test]
    fn sawtooth_is_monotonic() {
        let mut buf = [0u16; 500];
        synthesize(&mut buf, 100, Waveform::Sawtooth).unwrap();
        for pair in buf.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        let (lo, hi) = bounds(100);
        assert_eq!(buf[0], lo);
        assert_eq!(buf[499], hi);
    }

    #[test]
    fn triangle_is_symmetric_within_one_ramp_step() {
        let mut buf = [0u16; 1024];
        for &count in &[8usize, 7, 500, 1024] {
            synthesize(&mut buf[..count], 100, Waveform::Triangle).unwrap();
            let max_val = FULL_SCALE as u32;
            let tolerance = (max_val / (count as u32 / 2)) + 1;
            for i in 0..count / 2 {
                let a = buf[i] as i32;
                let b = buf[count - 1 - i] as i32;
                assert!(
                    (a - b).unsigned_abs() <= tolerance,
                    "count={} i={} a={} b={}",
                    count,
                    i,
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn sine_peaks_near_quarter_period() {
        let mut buf = [0u16; 400];
        synthesize(&mut buf, 100, Waveform::Sine).unwrap();
        let mut peak_idx = 0;
        for (i, &s) in buf.iter().enumerate() {
            if s > buf[peak_idx] {
                peak_idx = i;
            }
        }
        // One period spans count + 1 samples, peak at a quarter of that.
        let expected = (buf.len() + 1) / 4;
        assert!((peak_idx as i32 - expected as i32).abs() <= 2);
    }

    // ── Parameter errors ─────────────────────────────────────────────

    #[test]
    fn rejects_undersized_slice() {
        let mut buf = [0xAAAAu16; 1];
        assert_eq!(
            synthesize(&mut buf, 100, Waveform::Sine),
            Err(SignalError::TooFewSamples)
        );
        assert_eq!(buf[0], 0xAAAA, "slice must be untouched on error");
    }

    #[test]
    fn rejects_out_of_range_level() {
        let mut buf = [0u16; 16];
        assert_eq!(
            synthesize(&mut buf, 0, Waveform::Triangle),
            Err(SignalError::InvalidDutyCycle)
        );
        assert_eq!(
            synthesize(&mut buf, 101, Waveform::Triangle),
            Err(SignalError::InvalidDutyCycle)
        );
    }

    // ── Cycling ──────────────────────────────────────────────────────

    #[test]
    fn next_cycles_through_all_four_shapes() {
        let mut w = Waveform::Sine;
        let mut seen = [w; 4];
        for slot in seen.iter_mut() {
            *slot = w;
            w = w.next();
        }
        assert_eq!(
            seen,
            [
                Waveform::Sine,
                Waveform::Triangle,
                Waveform::Sawtooth,
                Waveform::Square
            ]
        );
        assert_eq!(w, Waveform::Sine);
    }
}

//! Sampling-clock search for the DAC-backed channels.
//!
//! A DAC channel plays its sample buffer at a *sampling clock*; the
//! output frequency is `sampling_clock / sample_count`. For a given
//! target frequency the search starts from the fastest clock the timer
//! can deliver and halves it until one period fits the fixed buffer.
//! Higher target frequencies therefore get fewer samples per period,
//! but the buffer can never overflow.

use super::error::SignalError;
use super::MIN_SAMPLE_COUNT;

/// A resolved sampling-clock / sample-count pair.
///
/// `clock_hz / sample_count` equals the requested output frequency up
/// to integer truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleRate {
    /// Rate at which samples are clocked out of the buffer.
    pub clock_hz: u32,
    /// Number of samples making up one output period. Always
    /// `<= capacity` passed to [`resolve`].
    pub sample_count: usize,
}

/// Find the fastest sampling clock whose period fits in `capacity`
/// samples.
///
/// Starts at `max_clock_hz` and halves (integer right-shift) while one
/// period of `target_freq_hz` would need more than `capacity` samples.
/// The loop runs at most `log2(max_clock_hz)` iterations.
///
/// # Errors
///
/// [`SignalError::UnresolvableRate`] if `target_freq_hz` is 0, or so
/// high that even the undivided clock yields fewer than
/// [`MIN_SAMPLE_COUNT`] samples per period.
pub fn resolve(
    target_freq_hz: u32,
    max_clock_hz: u32,
    capacity: usize,
) -> Result<SampleRate, SignalError> {
    if target_freq_hz == 0 {
        return Err(SignalError::UnresolvableRate);
    }

    let mut clock_hz = max_clock_hz;
    while clock_hz / target_freq_hz > capacity as u32 {
        clock_hz >>= 1;
    }

    let sample_count = (clock_hz / target_freq_hz) as usize;
    if sample_count < MIN_SAMPLE_COUNT {
        return Err(SignalError::UnresolvableRate);
    }

    Ok(SampleRate {
        clock_hz,
        sample_count,
    })
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario_1khz_into_1024() {
        // 4 MHz start: 4000 samples, 2000 samples, then 1000 fits.
        let rate = resolve(1_000, 4_000_000, 1024).unwrap();
        assert_eq!(rate.clock_hz, 1_000_000);
        assert_eq!(rate.sample_count, 1_000);
    }

    #[test]
    fn smaller_capacity_halves_further() {
        // Same target into a 512-sample buffer: one more halving.
        let rate = resolve(1_000, 4_000_000, 512).unwrap();
        assert_eq!(rate.clock_hz, 500_000);
        assert_eq!(rate.sample_count, 500);
    }

    #[test]
    fn fast_target_keeps_full_clock() {
        // 200 kHz at 4 MHz is 20 samples per period, no halving.
        let rate = resolve(200_000, 4_000_000, 1024).unwrap();
        assert_eq!(rate.clock_hz, 4_000_000);
        assert_eq!(rate.sample_count, 20);
    }

    #[test]
    fn count_never_exceeds_capacity() {
        for freq in [100u32, 317, 1_000, 9_999, 44_100, 200_000] {
            for cap in [64usize, 512, 1024] {
                let rate = resolve(freq, 4_000_000, cap).unwrap();
                assert!(rate.sample_count <= cap, "freq={} cap={}", freq, cap);
                assert!(rate.sample_count >= MIN_SAMPLE_COUNT);
            }
        }
    }

    #[test]
    fn low_frequency_uses_divided_clock() {
        // 100 Hz needs 40000 samples at 4 MHz; halving lands at
        // 4 MHz >> 6 = 62.5 kHz for 625 samples.
        let rate = resolve(100, 4_000_000, 1024).unwrap();
        assert_eq!(rate.clock_hz, 62_500);
        assert_eq!(rate.sample_count, 625);
    }

    #[test]
    fn rejects_zero_frequency() {
        assert_eq!(
            resolve(0, 4_000_000, 1024),
            Err(SignalError::UnresolvableRate)
        );
    }

    #[test]
    fn rejects_target_above_clock_headroom() {
        // One period would hold fewer than two samples.
        assert_eq!(
            resolve(3_000_000, 4_000_000, 1024),
            Err(SignalError::UnresolvableRate)
        );
        assert_eq!(
            resolve(8_000_000, 4_000_000, 1024),
            Err(SignalError::UnresolvableRate)
        );
    }

    #[test]
    fn exact_two_samples_is_accepted() {
        let rate = resolve(2_000_000, 4_000_000, 1024).unwrap();
        assert_eq!(rate.sample_count, 2);
        assert_eq!(rate.clock_hz, 4_000_000);
    }
}

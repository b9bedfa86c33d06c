/// Parameter errors reported by the signal core.
///
/// All variants are programmer-error or out-of-contract inputs. The
/// coordinator reacts to every one of them the same way: skip the
/// hardware reprogram for that cycle and keep polling — the previously
/// programmed configuration stays running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalError {
    /// Channel index is out of bounds (must be < CHANNEL_COUNT).
    InvalidChannelIndex,
    /// PWM duty cycle of 0 or 100 — no meaningful compare edge exists.
    InvalidDutyCycle,
    /// Target sample slice holds fewer than [`MIN_SAMPLE_COUNT`] entries.
    ///
    /// [`MIN_SAMPLE_COUNT`]: super::MIN_SAMPLE_COUNT
    TooFewSamples,
    /// No sampling clock divider yields at least [`MIN_SAMPLE_COUNT`]
    /// samples per period for the requested frequency.
    ///
    /// [`MIN_SAMPLE_COUNT`]: super::MIN_SAMPLE_COUNT
    UnresolvableRate,
}

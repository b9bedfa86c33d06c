//! The four-channel bank and its selection semantics.

use super::channel::ChannelState;
use super::error::SignalError;
use super::CHANNEL_COUNT;

/// All four channel configurations plus the selection cursor.
///
/// The bank owns which channel the encoders edit; it knows nothing
/// about hardware. Exactly one channel is selected at all times and
/// `active` stays within `[0, CHANNEL_COUNT)` by construction — every
/// mutation path wraps or validates.
pub struct ChannelBank {
    channels: [ChannelState; CHANNEL_COUNT],
    active: usize,
}

impl Default for ChannelBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelBank {
    /// A bank with the startup configuration on every channel and
    /// channel 0 selected.
    pub fn new() -> Self {
        Self {
            channels: core::array::from_fn(ChannelState::new),
            active: 0,
        }
    }

    // ── Access ───────────────────────────────────────────────────────

    /// Index of the selected channel.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The selected channel's configuration.
    pub fn active(&self) -> &ChannelState {
        &self.channels[self.active]
    }

    /// Configuration of the channel at `index`.
    pub fn channel(&self, index: usize) -> Result<&ChannelState, SignalError> {
        self.channels
            .get(index)
            .ok_or(SignalError::InvalidChannelIndex)
    }

    /// Mutable configuration of the channel at `index`.
    pub fn channel_mut(
        &mut self,
        index: usize,
    ) -> Result<&mut ChannelState, SignalError> {
        self.channels
            .get_mut(index)
            .ok_or(SignalError::InvalidChannelIndex)
    }

    /// All four channels in index order.
    pub fn channels(&self) -> &[ChannelState; CHANNEL_COUNT] {
        &self.channels
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Advance the selection to the next channel, wrapping after the
    /// last one.
    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % CHANNEL_COUNT;
    }

    /// A tap on channel `index`'s selector.
    ///
    /// Dual semantics: tapping an *unselected* channel moves the
    /// selection there without touching its waveform; tapping the
    /// *already selected* channel advances that channel's waveform.
    /// One control thereby serves as both "select" and "cycle".
    pub fn selector_tap(&mut self, index: usize) -> Result<(), SignalError> {
        if index >= CHANNEL_COUNT {
            #[cfg(feature = "defmt")]
            defmt::warn!("selector_tap: channel {} out of bounds", index);
            return Err(SignalError::InvalidChannelIndex);
        }
        if index == self.active {
            self.channels[index].cycle_waveform();
        } else {
            self.active = index;
        }
        Ok(())
    }

    // ── Encoder routing ──────────────────────────────────────────────

    /// Route a frequency encoder delta to the selected channel.
    /// Returns `true` if the delta was nonzero.
    pub fn step_active_frequency(&mut self, steps: i32) -> bool {
        if steps == 0 {
            return false;
        }
        self.channels[self.active].step_frequency(steps);
        true
    }

    /// Route a level encoder delta to the selected channel. Returns
    /// `true` if the delta was nonzero.
    pub fn step_active_level(&mut self, steps: i32) -> bool {
        if steps == 0 {
            return false;
        }
        self.channels[self.active].step_level(steps);
        true
    }

    /// Advance the selected channel's waveform.
    pub fn cycle_active_waveform(&mut self) {
        self.channels[self.active].cycle_waveform();
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Waveform;

    #[test]
    fn starts_on_channel_zero() {
        let bank = ChannelBank::new();
        assert_eq!(bank.active_index(), 0);
        assert_eq!(bank.active().frequency_hz, 1_000);
    }

    // ── Selection ────────────────────────────────────────────────────

    #[test]
    fn select_next_wraps_after_last() {
        let mut bank = ChannelBank::new();
        for expected in [1, 2, 3, 0, 1] {
            bank.select_next();
            assert_eq!(bank.active_index(), expected);
        }
    }

    #[test]
    fn tap_on_other_channel_selects_without_cycling() {
        let mut bank = ChannelBank::new();
        let waveform_before = bank.channel(2).unwrap().waveform;
        bank.selector_tap(2).unwrap();
        assert_eq!(bank.active_index(), 2);
        assert_eq!(bank.channel(2).unwrap().waveform, waveform_before);
    }

    #[test]
    fn tap_on_active_channel_cycles_waveform() {
        let mut bank = ChannelBank::new();
        // Channel 0 is already active; four taps walk the full cycle.
        for expected in [
            Waveform::Triangle,
            Waveform::Sawtooth,
            Waveform::Square,
            Waveform::Sine,
        ] {
            bank.selector_tap(0).unwrap();
            assert_eq!(bank.channel(0).unwrap().waveform, expected);
            assert_eq!(bank.active_index(), 0, "selection must not move");
        }
    }

    #[test]
    fn tap_on_active_digital_channel_is_a_noop() {
        let mut bank = ChannelBank::new();
        bank.selector_tap(3).unwrap();
        bank.selector_tap(3).unwrap();
        assert_eq!(bank.channel(3).unwrap().waveform, Waveform::Square);
        assert_eq!(bank.active_index(), 3);
    }

    #[test]
    fn tap_out_of_bounds_is_rejected() {
        let mut bank = ChannelBank::new();
        assert_eq!(
            bank.selector_tap(4),
            Err(SignalError::InvalidChannelIndex)
        );
        assert_eq!(bank.active_index(), 0);
    }

    // ── Encoder routing ──────────────────────────────────────────────

    #[test]
    fn deltas_only_touch_the_active_channel() {
        let mut bank = ChannelBank::new();
        bank.select_next(); // channel 1
        assert!(bank.step_active_frequency(1));
        assert_eq!(bank.channel(1).unwrap().frequency_hz, 2_100);
        assert_eq!(bank.channel(0).unwrap().frequency_hz, 1_000);
    }

    #[test]
    fn zero_delta_reports_no_change() {
        let mut bank = ChannelBank::new();
        assert!(!bank.step_active_frequency(0));
        assert!(!bank.step_active_level(0));
    }

    #[test]
    fn channel_access_bounds() {
        let bank = ChannelBank::new();
        assert!(bank.channel(3).is_ok());
        assert_eq!(bank.channel(4), Err(SignalError::InvalidChannelIndex));
    }
}

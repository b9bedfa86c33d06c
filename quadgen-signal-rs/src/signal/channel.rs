//! Per-channel generator state and the encoder stepping rules.

use super::waveform::Waveform;
use super::FIRST_DIGITAL_CHANNEL;

/// Absolute frequency floor for every channel, in Hz.
pub const FREQ_FLOOR_HZ: u32 = 100;

/// Frequency ceiling for DAC-backed channels, in Hz.
pub const ANALOG_FREQ_CEILING_HZ: u32 = 200_000;

/// Frequency ceiling for PWM-backed channels, in Hz.
pub const DIGITAL_FREQ_CEILING_HZ: u32 = 10_000_000;

/// Hardware class of a channel, fixed by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelClass {
    /// DAC-driven arbitrary sample buffer. Level is amplitude percent.
    Analog,
    /// Hardware PWM square wave. Level is duty-cycle percent.
    Digital,
}

impl ChannelClass {
    /// Class of the channel at `index`: `{0, 1}` analog, `{2, 3}`
    /// digital.
    pub fn of_index(index: usize) -> Self {
        if index < FIRST_DIGITAL_CHANNEL {
            ChannelClass::Analog
        } else {
            ChannelClass::Digital
        }
    }

    /// Upper frequency bound for this class, in Hz.
    pub fn freq_ceiling_hz(self) -> u32 {
        match self {
            ChannelClass::Analog => ANALOG_FREQ_CEILING_HZ,
            ChannelClass::Digital => DIGITAL_FREQ_CEILING_HZ,
        }
    }

    /// Largest legal level value. Analog amplitude reaches 100%;
    /// digital duty stops at 99% so a compare edge always exists.
    pub fn level_max(self) -> u8 {
        match self {
            ChannelClass::Analog => 100,
            ChannelClass::Digital => 99,
        }
    }
}

/// Live configuration of one generator channel.
///
/// Mutated only by the coordinator, either through the encoder stepping
/// methods below or at startup. The fields are public for the display
/// and reprogram paths, which treat the state as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelState {
    /// Output frequency in Hz, within `[FREQ_FLOOR_HZ, class ceiling]`.
    pub frequency_hz: u32,
    /// Amplitude percent (analog, 1–100) or duty-cycle percent
    /// (digital, 1–99).
    pub level_percent: u8,
    /// Current shape. Digital channels stay pinned to Square.
    pub waveform: Waveform,
    class: ChannelClass,
}

impl ChannelState {
    /// Startup configuration for the channel at `index`: `(index + 1)`
    /// kHz, full amplitude Sine for analog, 50% duty Square for
    /// digital.
    pub fn new(index: usize) -> Self {
        let class = ChannelClass::of_index(index);
        let (level_percent, waveform) = match class {
            ChannelClass::Analog => (100, Waveform::Sine),
            ChannelClass::Digital => (50, Waveform::Square),
        };
        Self {
            frequency_hz: 1_000 * (index as u32 + 1),
            level_percent,
            waveform,
            class,
        }
    }

    /// Hardware class of this channel.
    pub fn class(&self) -> ChannelClass {
        self.class
    }

    /// `true` for DAC-backed channels.
    pub fn is_analog(&self) -> bool {
        self.class == ChannelClass::Analog
    }

    /// Apply a signed encoder delta to the frequency.
    ///
    /// The step size follows the current magnitude — 100 Hz steps below
    /// 10 kHz, then 1 kHz, 10 kHz and 100 kHz per decade — so one
    /// detent stays perceptible across the whole range. Each tier
    /// clamps to its own ceiling first, keeping a single large delta
    /// from jumping past a tier boundary; the result is then held to
    /// the absolute floor and the class ceiling.
    pub fn step_frequency(&mut self, steps: i32) {
        let steps = steps as i64;
        let freq = self.frequency_hz as i64;

        let freq = if freq >= 1_000_000 {
            freq + steps * 100_000
        } else if freq >= 100_000 {
            (freq + steps * 10_000).min(1_000_000)
        } else if freq >= 10_000 {
            (freq + steps * 1_000).min(100_000)
        } else {
            (freq + steps * 100).min(10_000)
        };

        let freq = freq
            .max(FREQ_FLOOR_HZ as i64)
            .min(self.class.freq_ceiling_hz() as i64);
        self.frequency_hz = freq as u32;
    }

    /// Apply a signed encoder delta to the level.
    ///
    /// Unlike frequency this wraps instead of clamping: stepping below
    /// 1 lands on the class maximum and stepping above the maximum
    /// lands on 1.
    pub fn step_level(&mut self, steps: i32) {
        let max = self.class.level_max() as i32;
        let mut level = self.level_percent as i32 + steps;
        if level < 1 {
            level = max;
        }
        if level > max {
            level = 1;
        }
        self.level_percent = level as u8;
    }

    /// Advance to the next waveform shape. A no-op on digital channels,
    /// which are re-pinned to Square.
    pub fn cycle_waveform(&mut self) {
        self.waveform = match self.class {
            ChannelClass::Analog => self.waveform.next(),
            ChannelClass::Digital => Waveform::Square,
        };
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ─────────────────────────────────────────────────────

    #[test]
    fn startup_defaults_per_index() {
        for index in 0..4 {
            let ch = ChannelState::new(index);
            assert_eq!(ch.frequency_hz, 1_000 * (index as u32 + 1));
            if index < FIRST_DIGITAL_CHANNEL {
                assert_eq!(ch.class(), ChannelClass::Analog);
                assert_eq!(ch.level_percent, 100);
                assert_eq!(ch.waveform, Waveform::Sine);
            } else {
                assert_eq!(ch.class(), ChannelClass::Digital);
                assert_eq!(ch.level_percent, 50);
                assert_eq!(ch.waveform, Waveform::Square);
            }
        }
    }

    // ── Frequency stepping ───────────────────────────────────────────

    #[test]
    fn frequency_floors_at_100() {
        let mut ch = ChannelState::new(0);
        ch.frequency_hz = 100;
        ch.step_frequency(-1);
        assert_eq!(ch.frequency_hz, 100);
        ch.step_frequency(-50);
        assert_eq!(ch.frequency_hz, 100);
    }

    #[test]
    fn analog_frequency_ceils_at_200khz() {
        let mut ch = ChannelState::new(0);
        ch.frequency_hz = 199_000;
        ch.step_frequency(5);
        assert_eq!(ch.frequency_hz, ANALOG_FREQ_CEILING_HZ);
    }

    #[test]
    fn digital_frequency_ceils_at_10mhz() {
        let mut ch = ChannelState::new(2);
        ch.frequency_hz = 9_900_000;
        ch.step_frequency(3);
        assert_eq!(ch.frequency_hz, DIGITAL_FREQ_CEILING_HZ);
    }

    #[test]
    fn tier_crossing_switches_step_size() {
        let mut ch = ChannelState::new(2);
        // 9 999 is in the 100 Hz tier; a +1 delta clamps to the tier
        // ceiling rather than overshooting it.
        ch.frequency_hz = 9_999;
        ch.step_frequency(1);
        assert_eq!(ch.frequency_hz, 10_000);
        // The next delta is applied with the 1 kHz step.
        ch.step_frequency(1);
        assert_eq!(ch.frequency_hz, 11_000);
    }

    #[test]
    fn large_delta_stops_at_tier_ceiling() {
        let mut ch = ChannelState::new(2);
        ch.frequency_hz = 5_000;
        ch.step_frequency(1_000);
        assert_eq!(ch.frequency_hz, 10_000, "100 Hz tier clamps at 10 kHz");

        ch.step_frequency(1_000);
        assert_eq!(ch.frequency_hz, 100_000, "1 kHz tier clamps at 100 kHz");

        ch.step_frequency(1_000);
        assert_eq!(ch.frequency_hz, 1_000_000, "10 kHz tier clamps at 1 MHz");
    }

    #[test]
    fn top_tier_steps_by_100khz() {
        let mut ch = ChannelState::new(2);
        ch.frequency_hz = 1_000_000;
        ch.step_frequency(2);
        assert_eq!(ch.frequency_hz, 1_200_000);
        ch.step_frequency(-5);
        assert_eq!(ch.frequency_hz, 700_000);
    }

    #[test]
    fn step_down_through_tiers() {
        let mut ch = ChannelState::new(2);
        ch.frequency_hz = 100_000;
        // 100 kHz sits in the 10 kHz tier.
        ch.step_frequency(-1);
        assert_eq!(ch.frequency_hz, 90_000);
        ch.frequency_hz = 10_000;
        ch.step_frequency(-1);
        assert_eq!(ch.frequency_hz, 9_000);
    }

    // ── Level stepping ───────────────────────────────────────────────

    #[test]
    fn analog_level_wraps_both_directions() {
        let mut ch = ChannelState::new(0);
        ch.level_percent = 1;
        ch.step_level(-1);
        assert_eq!(ch.level_percent, 100);
        ch.step_level(1);
        assert_eq!(ch.level_percent, 1);
    }

    #[test]
    fn digital_level_wraps_at_99() {
        let mut ch = ChannelState::new(3);
        ch.level_percent = 99;
        ch.step_level(1);
        assert_eq!(ch.level_percent, 1);
        ch.step_level(-1);
        assert_eq!(ch.level_percent, 99);
    }

    #[test]
    fn level_step_is_uniform() {
        let mut ch = ChannelState::new(0);
        ch.level_percent = 50;
        ch.step_level(7);
        assert_eq!(ch.level_percent, 57);
        ch.step_level(-12);
        assert_eq!(ch.level_percent, 45);
    }

    // ── Waveform cycling ─────────────────────────────────────────────

    #[test]
    fn analog_cycles_digital_stays_square() {
        let mut analog = ChannelState::new(0);
        analog.cycle_waveform();
        assert_eq!(analog.waveform, Waveform::Triangle);

        let mut digital = ChannelState::new(2);
        digital.cycle_waveform();
        assert_eq!(digital.waveform, Waveform::Square);
    }
}

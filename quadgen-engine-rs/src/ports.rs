//! Hardware port traits.
//!
//! The coordinator receives concrete implementations of these traits at
//! construction. The firmware crate implements them over the real
//! peripherals; the engine tests implement them with call-recording
//! mocks. All calls are fire-and-forget — the coordinator never waits
//! for hardware acknowledgment.

use quadgen_display_rs::PanelState;

/// Which physical encoder a query refers to. The left encoder edits
/// frequency, the right one edits amplitude/duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

/// Polled operator input: two rotary encoders with push-buttons.
pub trait InputPort {
    /// Signed step count accumulated on `side` since the previous
    /// call. Zero when the knob has not moved.
    fn encoder_delta(&mut self, side: Side) -> i32;

    /// `true` exactly once per press of `side`'s button — the
    /// implementation edge-detects against its own previous state.
    fn button_pressed(&mut self, side: Side) -> bool;
}

/// Sink for completed panel snapshots.
///
/// `present` hands over the whole frame; the implementation commits it
/// atomically from the coordinator's perspective (the firmware
/// publishes into a shared slot the display task drains).
pub trait DisplayPort {
    fn present(&mut self, panel: &PanelState);
}

/// One DAC-backed output: a trigger timer plus a DMA-fed DAC channel.
///
/// The coordinator calls these primitives in a fixed order (stop timer,
/// stop DMA, write period, force reload, start DMA, start timer); the
/// implementation must not reorder them.
pub trait AnalogOutput {
    /// Input clock of the trigger timer's period register, in Hz.
    fn clock_hz(&self) -> u32;

    /// Halt the trigger timer.
    fn stop_timer(&mut self);

    /// Halt the DMA-fed DAC output.
    fn stop_dma(&mut self);

    /// Write the trigger timer's period register. Values wider than
    /// the hardware register are truncated by the implementation.
    fn set_period(&mut self, ticks: u32);

    /// Force a register reload so the new period takes effect
    /// immediately instead of at the next natural wrap.
    fn force_reload(&mut self);

    /// Start circular DMA from `samples` into the DAC.
    ///
    /// The caller keeps `samples` alive and unmodified until the next
    /// [`stop_dma()`](Self::stop_dma) call.
    fn start_dma(&mut self, samples: &[u16]);

    /// Start the trigger timer.
    fn start_timer(&mut self);
}

/// One PWM-backed output: a timer compare channel.
///
/// Same ordering contract as [`AnalogOutput`]: period, compare, force
/// reload, start.
pub trait PwmOutput {
    /// Input clock of the timer's period register, in Hz.
    fn clock_hz(&self) -> u32;

    /// Write the period (auto-reload) register.
    fn set_period(&mut self, ticks: u32);

    /// Write the compare register that defines the duty edge.
    fn set_compare(&mut self, ticks: u32);

    /// Force a register reload so period and compare take effect
    /// together.
    fn force_reload(&mut self);

    /// Start (or refresh) PWM output.
    fn start(&mut self);
}

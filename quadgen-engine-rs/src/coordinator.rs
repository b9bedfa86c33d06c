//! The channel coordinator: poll loop body and reprogram sequencing.

use quadgen::signal::{
    sample_rate, synthesize, ChannelBank, SignalError, CHANNEL_COUNT,
    FIRST_DIGITAL_CHANNEL,
};
use quadgen_display_rs::PanelState;

use crate::inbox::{ControlEvent, ControlInbox, EventKind};
use crate::ports::{AnalogOutput, DisplayPort, InputPort, PwmOutput, Side};

/// Samples each DAC buffer can hold. Sized for the lowest supported
/// frequency after the sampling-clock search has divided down.
pub const DAC_BUFFER_CAPACITY: usize = 1024;

/// Fastest clock the DAC trigger timers are asked to run at, in Hz.
pub const MAX_SAMPLING_CLOCK_HZ: u32 = 4_000_000;

/// Smallest value written to a trigger timer's period register. Keeps
/// a mis-derived divider from programming a degenerate zero-length
/// period.
pub const MIN_PERIOD_TICKS: u32 = 20;

/// Number of DAC-backed channels (and sample buffers).
const ANALOG_COUNT: usize = FIRST_DIGITAL_CHANNEL;

/// Owns the channel bank, the sample buffers and the hardware ports,
/// and runs the Idle/Dirty control cycle.
///
/// All collaborators arrive at construction: `I` polls the encoders,
/// `D` receives panel snapshots, `A` and `P` drive the two DAC-backed
/// and two PWM-backed outputs. The inbox reference is shared with
/// whatever interrupt context posts selector taps.
///
/// The coordinator is the only writer of the bank and the buffers; one
/// call to [`service()`](Self::service) is one iteration of the
/// firmware's 100 ms poll loop.
pub struct Coordinator<'a, I, D, A, P> {
    bank: ChannelBank,
    input: I,
    display: D,
    analog: [A; ANALOG_COUNT],
    pwm: [P; CHANNEL_COUNT - ANALOG_COUNT],
    dac_buffers: [[u16; DAC_BUFFER_CAPACITY]; ANALOG_COUNT],
    inbox: &'a ControlInbox,
    dirty: bool,
}

impl<'a, I, D, A, P> Coordinator<'a, I, D, A, P>
where
    I: InputPort,
    D: DisplayPort,
    A: AnalogOutput,
    P: PwmOutput,
{
    pub fn new(
        input: I,
        display: D,
        analog: [A; 2],
        pwm: [P; 2],
        inbox: &'a ControlInbox,
    ) -> Self {
        Self {
            bank: ChannelBank::new(),
            input,
            display,
            analog,
            pwm,
            dac_buffers: [[0; DAC_BUFFER_CAPACITY]; ANALOG_COUNT],
            inbox,
            dirty: false,
        }
    }

    /// The live channel configurations.
    pub fn bank(&self) -> &ChannelBank {
        &self.bank
    }

    /// Mutable access to the channel configurations, for programmatic
    /// setup outside the encoder path.
    pub fn bank_mut(&mut self) -> &mut ChannelBank {
        &mut self.bank
    }

    /// Program every channel with its current configuration and push
    /// the initial panel. Called once before the first
    /// [`service()`](Self::service) iteration.
    pub fn start(&mut self) {
        for index in 0..CHANNEL_COUNT {
            if let Err(_e) = self.reprogram(index) {
                #[cfg(feature = "defmt")]
                defmt::warn!("channel {} startup program rejected: {}", index, _e);
            }
        }
        self.present();
    }

    /// One poll-loop iteration: drain the inbox, sample the encoders
    /// and buttons, and — if anything changed — redraw the panel and
    /// reprogram the selected channel.
    pub fn service(&mut self) {
        while let Some(event) = self.inbox.take() {
            self.apply_event(event);
        }

        if self.input.button_pressed(Side::Left) {
            self.bank.select_next();
            self.dirty = true;
        }
        if self.input.button_pressed(Side::Right) {
            self.bank.cycle_active_waveform();
            self.dirty = true;
        }

        let steps = self.input.encoder_delta(Side::Left);
        if self.bank.step_active_frequency(steps) {
            self.dirty = true;
        }
        let steps = self.input.encoder_delta(Side::Right);
        if self.bank.step_active_level(steps) {
            self.dirty = true;
        }

        if self.dirty {
            self.refresh();
            self.dirty = false;
        }
    }

    fn apply_event(&mut self, event: ControlEvent) {
        match event.kind {
            EventKind::SelectorTap => {
                if self.bank.selector_tap(event.channel as usize).is_ok() {
                    self.dirty = true;
                }
            }
        }
    }

    /// The Dirty → Idle pass: rebuild and present all four tiles, then
    /// reprogram exactly the selected channel. The other three keep
    /// running unmodified. A rejected reprogram leaves the previous
    /// hardware configuration running and the loop polling.
    fn refresh(&mut self) {
        self.present();

        let active = self.bank.active_index();
        if let Err(_e) = self.reprogram(active) {
            #[cfg(feature = "defmt")]
            defmt::warn!("channel {} reprogram rejected: {}", active, _e);
        }
    }

    fn present(&mut self) {
        let panel = PanelState::from_bank(&self.bank);
        self.display.present(&panel);
    }

    /// Push the current configuration of channel `index` to its
    /// peripheral.
    ///
    /// # Errors
    ///
    /// [`SignalError::InvalidChannelIndex`] for an index outside the
    /// four channels; the per-class errors of the analog and PWM paths
    /// otherwise. No hardware is touched on any error.
    pub fn reprogram(&mut self, index: usize) -> Result<(), SignalError> {
        match index {
            0..=1 => self.reprogram_analog(index),
            2..=3 => self.reprogram_pwm(index),
            _ => Err(SignalError::InvalidChannelIndex),
        }
    }

    /// DAC channel reprogram, in glitch-minimizing order: resolve the
    /// sampling clock, synthesize the buffer, and only then stop the
    /// running output, retime it and restart it.
    fn reprogram_analog(&mut self, index: usize) -> Result<(), SignalError> {
        let channel = *self.bank.channel(index)?;

        let rate = sample_rate::resolve(
            channel.frequency_hz,
            MAX_SAMPLING_CLOCK_HZ,
            DAC_BUFFER_CAPACITY,
        )?;
        synthesize(
            &mut self.dac_buffers[index][..rate.sample_count],
            channel.level_percent,
            channel.waveform,
        )?;

        let out = &mut self.analog[index];
        out.stop_timer();
        out.stop_dma();
        let ticks = (out.clock_hz() / rate.clock_hz)
            .saturating_sub(1)
            .max(MIN_PERIOD_TICKS);
        out.set_period(ticks);
        out.force_reload();
        out.start_dma(&self.dac_buffers[index][..rate.sample_count]);
        out.start_timer();
        Ok(())
    }

    /// PWM channel reprogram. Duty 0 and 100 have no compare edge and
    /// are rejected with the previous configuration left running.
    fn reprogram_pwm(&mut self, index: usize) -> Result<(), SignalError> {
        let channel = *self.bank.channel(index)?;
        if channel.level_percent == 0 || channel.level_percent >= 100 {
            return Err(SignalError::InvalidDutyCycle);
        }

        let out = &mut self.pwm[index - ANALOG_COUNT];
        let period = out.clock_hz() / channel.frequency_hz;
        out.set_period(period);
        out.set_compare((period * channel.level_percent as u32) / 100);
        out.force_reload();
        out.start();
        Ok(())
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

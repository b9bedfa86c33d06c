//! Channel coordinator for the quadgen four-channel generator.
//!
//! The [`Coordinator`] owns the [`ChannelBank`] and the DAC sample
//! buffers, interprets encoder and button input, and sequences the
//! glitch-minimizing reprogram of whichever channel the operator
//! touched. Hardware is reached exclusively through the port traits in
//! [`ports`], so the whole control flow runs on the host under test
//! with mock ports.
//!
//! Asynchronous input (per-channel selector taps fired from interrupt
//! context) arrives through the lock-free single-slot [`ControlInbox`],
//! drained at the top of every poll iteration.
//!
//! [`ChannelBank`]: quadgen::signal::ChannelBank

#![no_std]

#[cfg(test)]
extern crate std;

pub mod coordinator;
pub mod inbox;
pub mod ports;

pub use coordinator::{
    Coordinator, DAC_BUFFER_CAPACITY, MAX_SAMPLING_CLOCK_HZ, MIN_PERIOD_TICKS,
};
pub use inbox::{ControlEvent, ControlInbox, EventKind};
pub use ports::{AnalogOutput, DisplayPort, InputPort, PwmOutput, Side};

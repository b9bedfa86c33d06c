//! Channel state and waveform mathematics for the four-channel generator.
//!
//! This module provides the data structures and pure computations shared
//! by the coordinator, the display and the firmware: the [`ChannelBank`]
//! that tracks what the operator has dialed in on each channel, the
//! [`synthesize`] routine that fills DAC sample buffers, and the
//! [`resolve`](sample_rate::resolve) search that maps a target output
//! frequency onto an achievable sampling clock.
//!
//! # Architecture
//!
//! The generator has four channels mapped to fixed hardware resources:
//!
//! ```text
//! Channel 0 (Analog):  DAC output, arbitrary waveform from a sample buffer
//! Channel 1 (Analog):  DAC output, arbitrary waveform from a sample buffer
//! Channel 2 (Digital): hardware PWM, square wave from period/compare
//! Channel 3 (Digital): hardware PWM, square wave from period/compare
//! ```
//!
//! Exactly one channel is *selected* at a time; selection decides which
//! channel the encoders edit and which tile the display highlights. All
//! four channels keep running their last-programmed configuration
//! regardless of selection.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation anywhere. Sample buffers are fixed-size arrays
//! owned by the caller and filled in place. The optional `defmt` feature
//! enables structured logging for embedded targets.

mod bank;
mod channel;
mod error;
pub mod sample_rate;
mod waveform;

pub use bank::ChannelBank;
pub use channel::{ChannelClass, ChannelState};
pub use error::SignalError;
pub use sample_rate::SampleRate;
pub use waveform::{synthesize, Waveform};

/// Number of generator channels (two DAC-backed, two PWM-backed).
pub const CHANNEL_COUNT: usize = 4;

/// Index of the first digital (PWM-backed) channel. Channels below this
/// are analog (DAC-backed).
pub const FIRST_DIGITAL_CHANNEL: usize = 2;

/// Full-scale DAC sample value (12-bit, right-aligned).
pub const FULL_SCALE: u16 = 0x0FFF;

/// Fewest samples a synthesized period may hold. Below this a waveform
/// degenerates to a constant level.
pub const MIN_SAMPLE_COUNT: usize = 2;

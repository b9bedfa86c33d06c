//! Signal-generation core for the quadgen four-channel generator.
//!
//! This crate holds everything that can be computed without touching
//! hardware: waveform sample-buffer synthesis, the sampling-clock /
//! sample-count search, and the per-channel frequency/duty/waveform
//! state with its clamping rules. The coordinator crate drives it; the
//! firmware crate never calls it directly.

#![no_std]

pub mod signal;

//! Operator input adapter: two quadrature encoders on timer counters
//! plus their push-buttons.
//!
//! The encoders run in hardware quadrature mode; [`EncoderPanel`]
//! reads the free-running counters per poll, converts the wrapping
//! count difference into whole detent steps, and edge-detects the
//! buttons against its own previous sample — the coordinator only ever
//! sees "steps since last call" and "transitioned to pressed".

use embassy_stm32::gpio::Input;
use embassy_stm32::timer::qei::Qei;
use embassy_stm32::timer::GeneralInstance4Channel;

use quadgen_engine::{InputPort, Side};

/// Quadrature counts per mechanical detent.
const COUNTS_PER_STEP: i32 = 4;

/// Polled input state for both encoders and both buttons.
pub struct EncoderPanel<'d, TL, TR>
where
    TL: GeneralInstance4Channel,
    TR: GeneralInstance4Channel,
{
    left: Qei<'d, TL>,
    right: Qei<'d, TR>,
    /// Counter values at the previous poll, per side.
    last_counts: [u16; 2],
    /// Sub-detent counts carried into the next poll, per side.
    residuals: [i32; 2],
    buttons: [Input<'d>; 2],
    /// Button levels at the previous poll, per side.
    last_pressed: [bool; 2],
}

impl<'d, TL, TR> EncoderPanel<'d, TL, TR>
where
    TL: GeneralInstance4Channel,
    TR: GeneralInstance4Channel,
{
    /// Wrap the two quadrature counters and active-low buttons. The
    /// current counter values become the baseline, so the first poll
    /// reports zero movement.
    pub fn new(
        left: Qei<'d, TL>,
        right: Qei<'d, TR>,
        left_button: Input<'d>,
        right_button: Input<'d>,
    ) -> Self {
        let last_counts = [left.count(), right.count()];
        Self {
            left,
            right,
            last_counts,
            residuals: [0; 2],
            buttons: [left_button, right_button],
            last_pressed: [false; 2],
        }
    }
}

impl<TL, TR> InputPort for EncoderPanel<'_, TL, TR>
where
    TL: GeneralInstance4Channel,
    TR: GeneralInstance4Channel,
{
    fn encoder_delta(&mut self, side: Side) -> i32 {
        let idx = side as usize;
        let count = match side {
            Side::Left => self.left.count(),
            Side::Right => self.right.count(),
        };
        // The counter wraps at 16 bits; the i16 reinterpretation keeps
        // the difference signed across the wrap.
        let diff = count.wrapping_sub(self.last_counts[idx]) as i16 as i32;
        self.last_counts[idx] = count;

        let total = self.residuals[idx] + diff;
        self.residuals[idx] = total % COUNTS_PER_STEP;
        total / COUNTS_PER_STEP
    }

    fn button_pressed(&mut self, side: Side) -> bool {
        let idx = side as usize;
        let pressed = self.buttons[idx].is_low();
        let edge = pressed && !self.last_pressed[idx];
        self.last_pressed[idx] = pressed;
        edge
    }
}

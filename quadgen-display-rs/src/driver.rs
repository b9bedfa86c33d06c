//! SSD1306 wrapper in async buffered-graphics mode.
//!
//! [`Screen`] pairs the `ssd1306` driver with the panel renderer:
//! construction generates no I2C traffic, [`Screen::init()`] sends the
//! controller's initialization sequence, [`Screen::draw_panel()`]
//! renders a [`PanelState`] into the frame buffer, and
//! [`Screen::flush()`] transfers the buffer to hardware.

use display_interface_i2c::I2CInterface;
use embedded_hal_async::i2c::I2c;
use ssd1306::{
    mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async,
};

use crate::error::ScreenError;
use crate::layout::{render_panel, PanelConfig, PanelState};

/// Concrete display type used internally by [`Screen`].
type Display<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Async wrapper for an SSD1306 128×64 OLED over I2C.
pub struct Screen<I2C> {
    display: Display<I2C>,
    /// Set after a successful `init()`; guards `flush()`.
    ready: bool,
}

impl<I2C> Screen<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialized screen. No I2C traffic is generated;
    /// [`init()`](Self::init) must run before any flush.
    ///
    /// `address` is the 7-bit I2C device address, typically `0x3C`.
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display =
            Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode();

        Self {
            display,
            ready: false,
        }
    }

    /// Send the SSD1306 initialization sequence.
    ///
    /// # Errors
    ///
    /// [`ScreenError::InitFailed`] if the controller does not respond.
    pub async fn init(&mut self) -> Result<(), ScreenError> {
        self.display
            .init()
            .await
            .map_err(|_| ScreenError::InitFailed)?;
        self.ready = true;
        Ok(())
    }

    /// Render a panel snapshot into the in-memory frame buffer.
    ///
    /// Does not send any I2C traffic — the hardware is unchanged until
    /// [`flush()`](Self::flush).
    pub fn draw_panel(&mut self, state: &PanelState, config: &PanelConfig) {
        self.display.clear_buffer();
        // Drawing into the buffered mode is infallible.
        let _ = render_panel(&mut self.display, state, config);
    }

    /// Transfer the frame buffer to the display via I2C.
    ///
    /// At 400 kHz this takes roughly 20 ms for a full 1024-byte frame.
    ///
    /// # Errors
    ///
    /// [`ScreenError::NotReady`] before a successful
    /// [`init()`](Self::init), [`ScreenError::Interface`] on a
    /// bus-level failure.
    pub async fn flush(&mut self) -> Result<(), ScreenError> {
        if !self.ready {
            return Err(ScreenError::NotReady);
        }
        self.display.flush().await?;
        Ok(())
    }

    /// Whether [`init()`](Self::init) has succeeded.
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

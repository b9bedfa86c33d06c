//! Error types for the OLED screen wrapper.

use display_interface::DisplayError;

/// Errors that can occur during screen operations.
///
/// The `ssd1306` crate wraps all underlying I2C bus errors into
/// [`DisplayError`], so this enum is non-generic.
#[derive(Debug)]
pub enum ScreenError {
    /// Display interface error (wraps I2C and other bus-level failures).
    Interface(DisplayError),
    /// Display hardware did not respond to initialization.
    InitFailed,
    /// An operation was attempted before [`Screen::init()`](crate::Screen::init)
    /// succeeded.
    NotReady,
}

impl From<DisplayError> for ScreenError {
    fn from(e: DisplayError) -> Self {
        ScreenError::Interface(e)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScreenError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ScreenError::Interface(_e) => defmt::write!(f, "Display interface error"),
            ScreenError::InitFailed => defmt::write!(f, "Initialization failed"),
            ScreenError::NotReady => defmt::write!(f, "Not initialized"),
        }
    }
}

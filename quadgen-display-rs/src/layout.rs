//! Panel layout types and rendering logic.
//!
//! This module defines the immutable [`PanelState`] snapshot, built
//! from the live [`ChannelBank`], and the [`render_panel`] function
//! that draws the 2×2 channel grid using `embedded-graphics`.
//!
//! [`ChannelBank`]: quadgen::signal::ChannelBank

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{ascii::FONT_4X6, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Polyline, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use heapless::String;

use quadgen::signal::{ChannelBank, ChannelClass, Waveform, CHANNEL_COUNT};

// ── PanelConfig ──────────────────────────────────────────────────────────

/// Configuration for the panel layout and update task.
///
/// All layout geometry lives here. [`PanelConfig::default()`] gives the
/// stock geometry: a 128×64 display split into four 64×32 channel
/// tiles, refreshed at 30 Hz.
pub struct PanelConfig {
    /// Display refresh rate in Hz for the task variant. Default: 30.
    pub update_frequency_hz: u32,

    // ── Layout geometry ──────────────────────────────────────────────
    /// Total display width in pixels. Default: 128.
    pub display_width: u32,
    /// Total display height in pixels. Default: 64.
    pub display_height: u32,
    /// Width of each channel tile in pixels. Default: 64.
    pub tile_width: u32,
    /// Height of each channel tile in pixels. Default: 32.
    pub tile_height: u32,
    /// Waveform icon offset from the tile's top-left corner. Default: (3, 3).
    pub icon_inset: Point,
    /// Waveform glyph text offset from the tile's top-left corner.
    /// Default: (24, 4).
    pub glyph_inset: Point,
    /// Frequency label offset from the tile's top-left corner. Default: (2, 15).
    pub freq_label_inset: Point,
    /// Level label offset from the tile's top-left corner. Default: (2, 23).
    pub level_label_inset: Point,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: 30,
            display_width: 128,
            display_height: 64,
            tile_width: 64,
            tile_height: 32,
            icon_inset: Point::new(3, 3),
            glyph_inset: Point::new(24, 4),
            freq_label_inset: Point::new(2, 15),
            level_label_inset: Point::new(2, 23),
        }
    }
}

impl PanelConfig {
    /// Convert the configured frequency to a timer period in
    /// milliseconds: `1000 / update_frequency_hz`.
    pub fn update_period_ms(&self) -> u64 {
        1000 / self.update_frequency_hz as u64
    }

    /// Top-left corner of the tile for channel `index` (row-major 2×2).
    pub fn tile_origin(&self, index: usize) -> Point {
        Point::new(
            (index as i32 % 2) * self.tile_width as i32,
            (index as i32 / 2) * self.tile_height as i32,
        )
    }
}

// ── TileState ────────────────────────────────────────────────────────────

/// Label buffer length. Labels are null-padded UTF-8 with at most
/// `LABEL_LEN - 1` usable bytes.
const LABEL_LEN: usize = 20;

/// One channel's slice of the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileState {
    /// Shape shown as icon and glyph.
    pub waveform: Waveform,
    /// `Freq: <value> Hz` label, null-padded UTF-8.
    pub freq_label: [u8; LABEL_LEN],
    /// `Ampl:`/`Duty: <value> %` label, null-padded UTF-8.
    pub level_label: [u8; LABEL_LEN],
    /// `true` on the selected channel's tile; drawn with a border.
    pub highlighted: bool,
}

impl Default for TileState {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            freq_label: [0; LABEL_LEN],
            level_label: [0; LABEL_LEN],
            highlighted: false,
        }
    }
}

// ── PanelState ───────────────────────────────────────────────────────────

/// Immutable snapshot of everything the display needs to render one
/// frame.
///
/// Fixed-size buffers avoid heap allocation, and `PartialEq` lets the
/// update task skip frames that match the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelState {
    /// One tile per channel, index order.
    pub tiles: [TileState; CHANNEL_COUNT],
}

impl PanelState {
    /// Build a snapshot from the live channel bank.
    ///
    /// Labels use a fixed-width numeric field so the text does not
    /// jitter as values change; the level label reads `Ampl:` on
    /// analog channels and `Duty:` on digital ones.
    pub fn from_bank(bank: &ChannelBank) -> Self {
        let mut state = Self::default();

        for (index, channel) in bank.channels().iter().enumerate() {
            let tile = &mut state.tiles[index];
            tile.waveform = channel.waveform;
            tile.highlighted = index == bank.active_index();

            let mut buf: String<{ LABEL_LEN - 1 }> = String::new();
            let _ = write!(buf, "Freq:{:>8} Hz", channel.frequency_hz);
            tile.freq_label = pack(&buf);

            buf.clear();
            let prefix = match channel.class() {
                ChannelClass::Analog => "Ampl",
                ChannelClass::Digital => "Duty",
            };
            let _ = write!(buf, "{}:{:>8} %", prefix, channel.level_percent);
            tile.level_label = pack(&buf);
        }

        state
    }

    /// Convert a null-padded byte array back to a `&str`.
    ///
    /// Stops at the first null byte. Returns `""` if the slice is not
    /// valid UTF-8.
    pub fn bytes_to_str(bytes: &[u8]) -> &str {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        core::str::from_utf8(&bytes[..end]).unwrap_or("")
    }
}

/// Copy a label into a fixed null-padded buffer, truncating if needed.
fn pack(s: &str) -> [u8; LABEL_LEN] {
    let mut out = [0u8; LABEL_LEN];
    let bytes = s.as_bytes();
    let len = bytes.len().min(LABEL_LEN - 1);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

// ── Waveform icons ───────────────────────────────────────────────────────

/// Polyline vertices for each waveform icon, in a 17×9 pixel box.
fn icon_vertices(waveform: Waveform) -> &'static [(i32, i32)] {
    match waveform {
        Waveform::Sine => &[
            (0, 4),
            (2, 1),
            (4, 0),
            (6, 1),
            (8, 4),
            (10, 7),
            (12, 8),
            (14, 7),
            (16, 4),
        ],
        Waveform::Triangle => &[(0, 8), (4, 0), (8, 8), (12, 0), (16, 8)],
        Waveform::Sawtooth => &[(0, 8), (8, 0), (8, 8), (16, 0)],
        Waveform::Square => &[(0, 8), (0, 0), (8, 0), (8, 8), (16, 8), (16, 0)],
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Render a [`PanelState`] to a display buffer using
/// `embedded-graphics`.
///
/// # Layout
///
/// ```text
/// ┌─────────────────────────┬─────────────────────────┐
/// │ ~icon~  SIN             │ ~icon~  TRI             │
/// │ Freq:    1000 Hz        │ Freq:    2000 Hz        │
/// │ Ampl:     100 %         │ Ampl:     100 %         │
/// ├─────────────────────────┼─────────────────────────┤
/// │ ~icon~  SQR             │ ~icon~  SQR             │
/// │ Freq:    3000 Hz        │ Freq:    4000 Hz        │
/// │ Duty:      50 %         │ Duty:      50 %         │
/// └─────────────────────────┴─────────────────────────┘
/// ```
///
/// The selected channel's tile gets a one-pixel border; everything
/// else renders identically for selected and unselected channels.
pub fn render_panel<D>(
    display: &mut D,
    state: &PanelState,
    config: &PanelConfig,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);
    let line_style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    for (index, tile) in state.tiles.iter().enumerate() {
        let origin = config.tile_origin(index);

        // Waveform icon and glyph
        let mut points: heapless::Vec<Point, 9> = heapless::Vec::new();
        for &(x, y) in icon_vertices(tile.waveform) {
            let _ = points.push(origin + config.icon_inset + Point::new(x, y));
        }
        Polyline::new(&points).into_styled(line_style).draw(display)?;
        Text::with_baseline(
            tile.waveform.glyph(),
            origin + config.glyph_inset,
            text_style,
            Baseline::Top,
        )
        .draw(display)?;

        // Labels
        Text::with_baseline(
            PanelState::bytes_to_str(&tile.freq_label),
            origin + config.freq_label_inset,
            text_style,
            Baseline::Top,
        )
        .draw(display)?;
        Text::with_baseline(
            PanelState::bytes_to_str(&tile.level_label),
            origin + config.level_label_inset,
            text_style,
            Baseline::Top,
        )
        .draw(display)?;

        // Selection border
        if tile.highlighted {
            Rectangle::new(
                origin,
                Size::new(config.tile_width, config.tile_height),
            )
            .into_styled(line_style)
            .draw(display)?;
        }
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[test]
    fn default_panel_state_is_empty() {
        let state = PanelState::default();
        for tile in &state.tiles {
            assert_eq!(tile.freq_label, [0u8; LABEL_LEN]);
            assert_eq!(tile.level_label, [0u8; LABEL_LEN]);
            assert!(!tile.highlighted);
        }
    }

    #[test]
    fn from_bank_formats_fixed_width_labels() {
        let bank = ChannelBank::new();
        let state = PanelState::from_bank(&bank);

        assert_eq!(
            PanelState::bytes_to_str(&state.tiles[0].freq_label),
            "Freq:    1000 Hz"
        );
        assert_eq!(
            PanelState::bytes_to_str(&state.tiles[0].level_label),
            "Ampl:     100 %"
        );
        // Digital channels label the level as duty.
        assert_eq!(
            PanelState::bytes_to_str(&state.tiles[2].freq_label),
            "Freq:    3000 Hz"
        );
        assert_eq!(
            PanelState::bytes_to_str(&state.tiles[2].level_label),
            "Duty:      50 %"
        );
    }

    #[test]
    fn from_bank_highlights_only_the_active_tile() {
        let mut bank = ChannelBank::new();
        bank.select_next();
        let state = PanelState::from_bank(&bank);

        for (i, tile) in state.tiles.iter().enumerate() {
            assert_eq!(tile.highlighted, i == 1);
        }
    }

    #[test]
    fn snapshot_equality_detects_changes() {
        let mut bank = ChannelBank::new();
        let before = PanelState::from_bank(&bank);
        assert_eq!(before, PanelState::from_bank(&bank));

        bank.step_active_frequency(1);
        let after = PanelState::from_bank(&bank);
        assert_ne!(before, after);
    }

    #[test]
    fn pack_truncates_long_labels() {
        let packed = pack("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(
            PanelState::bytes_to_str(&packed),
            "ABCDEFGHIJKLMNOPQRS"
        );
    }

    #[test]
    fn bytes_to_str_handles_null_padding() {
        let mut buf = [0u8; LABEL_LEN];
        buf[0] = b'H';
        buf[1] = b'i';
        assert_eq!(PanelState::bytes_to_str(&buf), "Hi");
        assert_eq!(PanelState::bytes_to_str(&[0u8; LABEL_LEN]), "");
    }

    #[test]
    fn tile_origins_form_a_2x2_grid() {
        let config = PanelConfig::default();
        assert_eq!(config.tile_origin(0), Point::new(0, 0));
        assert_eq!(config.tile_origin(1), Point::new(64, 0));
        assert_eq!(config.tile_origin(2), Point::new(0, 32));
        assert_eq!(config.tile_origin(3), Point::new(64, 32));
    }

    #[test]
    fn default_config_values() {
        let c = PanelConfig::default();
        assert_eq!(c.update_frequency_hz, 30);
        assert_eq!(c.display_width, 128);
        assert_eq!(c.display_height, 64);
        assert_eq!(c.tile_width, 64);
        assert_eq!(c.tile_height, 32);
        assert_eq!(c.update_period_ms(), 33);
    }

    #[test]
    fn every_waveform_has_an_icon() {
        for w in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Sawtooth,
            Waveform::Square,
        ] {
            assert!(icon_vertices(w).len() >= 2);
        }
    }

    #[test]
    fn render_smoke_test() {
        let mut display = MockDisplay::<BinaryColor>::new();
        display.set_allow_out_of_bounds_drawing(true);
        display.set_allow_overdraw(true);

        let state = PanelState::from_bank(&ChannelBank::new());
        render_panel(&mut display, &state, &PanelConfig::default()).unwrap();
    }
}

//! Async OLED panel rendering for the quadgen four-channel generator.
//!
//! This crate turns a [`ChannelBank`] into pixels: [`PanelState`] is an
//! immutable snapshot of the four channel tiles, [`render_panel`] draws
//! it through any `embedded-graphics` target, and [`Screen`] wraps an
//! SSD1306 128×64 in async buffered-graphics mode.
//!
//! # Quick Start
//!
//! ```ignore
//! use quadgen_display_rs::{Screen, PanelConfig, panel_update_task};
//!
//! // In your Embassy main:
//! let screen = Screen::new(i2c_oled, 0x3C);
//! spawner.spawn(oled_task(screen, shared_panel, PanelConfig::default())).unwrap();
//!
//! // Thin task wrapper (Embassy tasks cannot be generic):
//! #[embassy_executor::task]
//! async fn oled_task(
//!     screen: Screen<MyI2cType>,
//!     shared: &'static SharedPanel,
//!     config: PanelConfig,
//! ) {
//!     panel_update_task(screen, shared, config).await;
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`].
//! - **`task`** — the Embassy [`panel_update_task`] loop.
//!
//! [`ChannelBank`]: quadgen::signal::ChannelBank
//! [`panel_update_task`]: display_task::panel_update_task

#![no_std]

#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod layout;

#[cfg(feature = "task")]
pub use display_task::{panel_update_task, SharedPanel};
pub use driver::Screen;
pub use error::ScreenError;
pub use layout::{render_panel, PanelConfig, PanelState, TileState};

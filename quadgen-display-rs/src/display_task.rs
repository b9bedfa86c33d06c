//! Periodic panel update task.
//!
//! The coordinator publishes [`PanelState`] snapshots into a
//! [`SharedPanel`] slot; [`panel_update_task`] polls that slot at the
//! configured refresh rate, skips frames identical to the previous
//! one, and flushes changed frames to the OLED.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal_async::i2c::I2c;

use crate::driver::Screen;
use crate::layout::{PanelConfig, PanelState};

/// Single-slot handoff between the coordinator and the display task.
///
/// The coordinator overwrites the cell on every refresh; the task reads
/// it each cycle. `PanelState` is `Copy`, so both sides hold the lock
/// only for a memcpy.
pub type SharedPanel = Mutex<CriticalSectionRawMutex, Cell<PanelState>>;

/// Periodic display update loop.
///
/// This is a regular `async fn` — **not** an Embassy `#[task]`.
/// Callers should create a thin, concrete task wrapper that calls this
/// function, since Embassy tasks cannot be generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(
///     screen: Screen<MyConcreteI2cType>,
///     shared: &'static SharedPanel,
///     config: PanelConfig,
/// ) {
///     panel_update_task(screen, shared, config).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialize the display hardware.
/// 2. Loop at `config.update_frequency_hz`:
///    - Copy the latest snapshot out of the shared slot.
///    - Skip if it matches the previous frame.
///    - Render into the frame buffer and flush (~20 ms of I2C, no
///      lock held).
///
/// # Errors
///
/// * Initialization failure: logs the error and **returns** (task
///   exits — the generator keeps running without a display).
/// * Flush failure: logs the error and continues to the next cycle.
pub async fn panel_update_task<I2C>(
    mut screen: Screen<I2C>,
    shared: &'static SharedPanel,
    config: PanelConfig,
) where
    I2C: I2c,
{
    if let Err(_e) = screen.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED init failed: {}", _e);
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED initialized");

    let period = embassy_time::Duration::from_millis(config.update_period_ms());
    let mut last_state: Option<PanelState> = None;

    loop {
        embassy_time::Timer::after(period).await;

        let state = shared.lock(|cell| cell.get());
        if last_state == Some(state) {
            continue;
        }

        screen.draw_panel(&state, &config);
        if let Err(_e) = screen.flush().await {
            #[cfg(feature = "defmt")]
            defmt::error!("Flush failed: {}", _e);
            continue;
        }

        last_state = Some(state);
    }
}

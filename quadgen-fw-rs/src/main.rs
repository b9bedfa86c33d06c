//! quadgen-fw
//!
//! Four-channel signal generator firmware for the STM32F446. Wires the
//! three library crates into a live control loop:
//!
//! 1. Two rotary encoders (timer quadrature counters) set frequency and
//!    amplitude/duty; their push-buttons advance the selected channel
//!    and cycle the waveform.
//! 2. Four per-channel tap buttons post selector events into the
//!    coordinator's lock-free inbox from EXTI context.
//! 3. The coordinator polls every 100 ms, resynthesizes sample buffers
//!    and retimes the DAC/PWM peripherals when something changed.
//! 4. The OLED task wakes at 30 Hz and flushes changed panel frames to
//!    the SSD1306.

#![no_std]
#![no_main]

mod input;
mod outputs;

use core::cell::Cell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals::{self, I2C1};
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::qei::{Qei, QeiPin};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use quadgen_display_rs::{
    panel_update_task, PanelConfig, PanelState, Screen, SharedPanel,
};
use quadgen_engine::{
    ControlEvent, ControlInbox, Coordinator, DisplayPort, EventKind,
};

use input::EncoderPanel;
use outputs::{AnalogOut, PwmOut};

// ---------------------------------------------------------------------------
// Interrupt binding
// ---------------------------------------------------------------------------

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<I2C1>;
});

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Input clock of every generator timer: 180 MHz SYSCLK, APB1 at /4
/// with the ×2 timer-clock multiplier.
const TIMER_CLOCK_HZ: u32 = 90_000_000;

/// Coordinator poll cadence.
const POLL_PERIOD_MS: u64 = 100;

/// Tap-button debounce hold-off.
const DEBOUNCE_MS: u64 = 30;

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Selector-tap events from EXTI context into the coordinator.
static INBOX: ControlInbox = ControlInbox::new();

/// Panel snapshot handoff — written by the coordinator, drained by the
/// OLED task.
static PANEL: StaticCell<SharedPanel> = StaticCell::new();

/// The coordinator owns 4 KiB of DAC sample buffers; it lives in a
/// static instead of the task arena.
static COORDINATOR: StaticCell<Co> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// Concrete input adapter: left encoder on TIM3, right on TIM4.
type Encoders = EncoderPanel<'static, peripherals::TIM3, peripherals::TIM4>;

/// Concrete coordinator wiring.
type Co = Coordinator<'static, Encoders, PanelSink, AnalogOut, PwmOut>;

/// DisplayPort adapter publishing into the shared panel slot.
struct PanelSink(&'static SharedPanel);

impl DisplayPort for PanelSink {
    fn present(&mut self, panel: &PanelState) {
        self.0.lock(|cell| cell.set(*panel));
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `panel_update_task` so
/// it can be spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn oled_task(
    screen: Screen<I2c<'static, embassy_stm32::mode::Async>>,
    shared: &'static SharedPanel,
    config: PanelConfig,
) {
    panel_update_task(screen, shared, config).await;
}

/// The 100 ms cooperative control loop. One `service()` call per
/// iteration; peripheral calls inside are fire-and-forget, so the loop
/// never blocks on hardware.
#[embassy_executor::task]
async fn coordinator_task(coordinator: &'static mut Co) {
    coordinator.start();
    info!("generator running");
    loop {
        coordinator.service();
        Timer::after_millis(POLL_PERIOD_MS).await;
    }
}

/// One instance per channel tap button. Posts a typed event into the
/// single-slot inbox; the coordinator applies the select-or-cycle
/// semantics on its next iteration.
#[embassy_executor::task(pool_size = 4)]
async fn tap_button_task(mut button: ExtiInput<'static>, channel: u8) {
    loop {
        button.wait_for_falling_edge().await;
        INBOX.post(ControlEvent {
            channel,
            kind: EventKind::SelectorTap,
        });
        Timer::after_millis(DEBOUNCE_MS).await;
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // 180 MHz SYSCLK from the 16 MHz HSI via PLL; APB1 /4, APB2 /2.
    let mut config = embassy_stm32::Config::default();
    {
        use embassy_stm32::rcc::*;
        config.rcc.hsi = true;
        config.rcc.pll_src = PllSource::HSI;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV16,
            mul: PllMul::MUL360,
            divp: Some(PllPDiv::DIV2),
            divq: None,
            divr: None,
        });
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
    }
    let p = embassy_stm32::init(config);
    info!("quadgen-fw starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // DAC OUT1 → PA4   DAC OUT2 → PA5
    // TIM5_CH4 → PA3   TIM2_CH3 → PB10
    // Left encoder  → TIM3 (PA6/PA7), button PC0
    // Right encoder → TIM4 (PB6/PB7), button PC1
    // Tap buttons   → PC2..PC5 (EXTI, active-low)
    // OLED I2C1     → PB8 (SCL) / PB9 (SDA)
    // ———————————————————————————————————————————————————————————————————————

    // Generator peripherals not managed by Embassy drivers.
    outputs::init_hardware();

    // OLED on I2C1 at 400 kHz.
    let i2c = I2c::new(
        p.I2C1,
        p.PB8, // SCL
        p.PB9, // SDA
        Irqs,
        p.DMA1_CH6,
        p.DMA1_CH0,
        Hertz(400_000),
        Default::default(),
    );
    let screen = Screen::new(i2c, 0x3C);

    // Encoders in hardware quadrature mode, buttons active-low.
    let left = Qei::new(p.TIM3, QeiPin::new_ch1(p.PA6), QeiPin::new_ch2(p.PA7));
    let right = Qei::new(p.TIM4, QeiPin::new_ch1(p.PB6), QeiPin::new_ch2(p.PB7));
    let encoders = EncoderPanel::new(
        left,
        right,
        Input::new(p.PC0, Pull::Up),
        Input::new(p.PC1, Pull::Up),
    );

    let panel = PANEL.init(Mutex::new(Cell::new(PanelState::default())));

    let coordinator = COORDINATOR.init(Coordinator::new(
        encoders,
        PanelSink(panel),
        [
            AnalogOut::dac_out2_tim7(TIMER_CLOCK_HZ),
            AnalogOut::dac_out1_tim6(TIMER_CLOCK_HZ),
        ],
        [
            PwmOut::tim5_ch4(TIMER_CLOCK_HZ),
            PwmOut::tim2_ch3(TIMER_CLOCK_HZ),
        ],
        &INBOX,
    ));

    // —— Spawn tasks ————————————————————————————————————————————————————————

    spawner
        .spawn(oled_task(screen, panel, PanelConfig::default()))
        .unwrap();
    spawner.spawn(coordinator_task(coordinator)).unwrap();

    spawner
        .spawn(tap_button_task(ExtiInput::new(p.PC2, p.EXTI2, Pull::Up), 0))
        .unwrap();
    spawner
        .spawn(tap_button_task(ExtiInput::new(p.PC3, p.EXTI3, Pull::Up), 1))
        .unwrap();
    spawner
        .spawn(tap_button_task(ExtiInput::new(p.PC4, p.EXTI4, Pull::Up), 2))
        .unwrap();
    spawner
        .spawn(tap_button_task(ExtiInput::new(p.PC5, p.EXTI5, Pull::Up), 3))
        .unwrap();

    info!("all tasks spawned");
}

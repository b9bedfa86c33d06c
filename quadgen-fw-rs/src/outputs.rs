//! Register-level output adapters for the DAC and PWM channels.
//!
//! The coordinator drives these through the `AnalogOutput` and
//! `PwmOutput` port traits; each method is one register write or
//! start/stop primitive, in the order the coordinator sequences them.
//!
//! Fixed resource mapping (matching the board wiring):
//!
//! ```text
//! Channel 0: DAC OUT2 (PA5), trigger TIM7 TRGO, DMA1 stream 6 ch 7
//! Channel 1: DAC OUT1 (PA4), trigger TIM6 TRGO, DMA1 stream 5 ch 7
//! Channel 2: TIM5 CH4 PWM (PA3, AF2)
//! Channel 3: TIM2 CH3 PWM (PB10, AF1)
//! ```

use embassy_stm32::pac;

use quadgen_engine::{AnalogOutput, PwmOutput};

/// DMA request channel for both DAC streams on DMA1.
const DAC_DMA_REQUEST: u8 = 7;

/// One-time peripheral bring-up for everything the adapters touch:
/// clock enables, pin modes, DAC trigger selection, basic-timer TRGO
/// on update, and PWM mode-1 with preload on the compare channels.
///
/// Must run before the coordinator's first reprogram. Period, compare
/// and enable bits are left for the adapters.
pub fn init_hardware() {
    pac::RCC.apb1enr().modify(|w| {
        w.set_tim2en(true);
        w.set_tim5en(true);
        w.set_tim6en(true);
        w.set_tim7en(true);
        w.set_dacen(true);
    });
    pac::RCC.ahb1enr().modify(|w| {
        w.set_gpioaen(true);
        w.set_gpioben(true);
        w.set_dma1en(true);
    });

    // DAC pins are analog; PWM pins take their timer alternate function.
    pac::GPIOA.moder().modify(|w| {
        w.set_moder(4, pac::gpio::vals::Moder::ANALOG);
        w.set_moder(5, pac::gpio::vals::Moder::ANALOG);
        w.set_moder(3, pac::gpio::vals::Moder::ALTERNATE);
    });
    pac::GPIOA.afr(0).modify(|w| w.set_afr(3, 2)); // PA3 → TIM5_CH4
    pac::GPIOB.moder().modify(|w| {
        w.set_moder(10, pac::gpio::vals::Moder::ALTERNATE);
    });
    pac::GPIOB.afr(1).modify(|w| w.set_afr(10 - 8, 1)); // PB10 → TIM2_CH3

    // Basic timers raise TRGO on every update event; the DAC converts
    // one sample per TRGO.
    pac::TIM6.cr2().modify(|w| w.set_mms(pac::timer::vals::Mms::UPDATE));
    pac::TIM7.cr2().modify(|w| w.set_mms(pac::timer::vals::Mms::UPDATE));

    // Trigger selection: DAC channel 1 from TIM6 (TSEL 000), channel 2
    // from TIM7 (TSEL 010).
    pac::DAC1.cr().modify(|w| {
        w.set_ten(0, true);
        w.set_tsel(0, 0b000);
        w.set_ten(1, true);
        w.set_tsel(1, 0b010);
    });

    // PWM mode 1 with compare preload; period preload on the timers.
    pac::TIM5.ccmr_output(1).modify(|w| {
        w.set_ocm(1, pac::timer::vals::Ocm::PWM_MODE1);
        w.set_ocpe(1, true);
    });
    pac::TIM5.cr1().modify(|w| w.set_arpe(true));
    pac::TIM2.ccmr_output(1).modify(|w| {
        w.set_ocm(0, pac::timer::vals::Ocm::PWM_MODE1);
        w.set_ocpe(0, true);
    });
    pac::TIM2.cr1().modify(|w| w.set_arpe(true));
}

// ── Analog (DAC) outputs ─────────────────────────────────────────────

/// One DAC channel with its trigger timer and DMA stream.
pub struct AnalogOut {
    timer: pac::timer::TimBasic,
    stream_idx: usize,
    /// DAC channel index: 0 = OUT1, 1 = OUT2.
    dac_channel: usize,
    clock_hz: u32,
}

impl AnalogOut {
    /// Generator channel 0: DAC OUT2 triggered by TIM7.
    pub fn dac_out2_tim7(clock_hz: u32) -> Self {
        Self {
            timer: pac::TIM7,
            stream_idx: 6,
            dac_channel: 1,
            clock_hz,
        }
    }

    /// Generator channel 1: DAC OUT1 triggered by TIM6.
    pub fn dac_out1_tim6(clock_hz: u32) -> Self {
        Self {
            timer: pac::TIM6,
            stream_idx: 5,
            dac_channel: 0,
            clock_hz,
        }
    }

    fn stream(&self) -> pac::dma::St {
        pac::DMA1.st(self.stream_idx)
    }
}

impl AnalogOutput for AnalogOut {
    fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn stop_timer(&mut self) {
        self.timer.cr1().modify(|w| w.set_cen(false));
    }

    fn stop_dma(&mut self) {
        pac::DAC1.cr().modify(|w| {
            w.set_en(self.dac_channel, false);
            w.set_dmaen(self.dac_channel, false);
        });
        let stream = self.stream();
        stream.cr().modify(|w| w.set_en(false));
        // EN reads back 0 once the stream has actually released.
        while stream.cr().read().en() {}
    }

    fn set_period(&mut self, ticks: u32) {
        self.timer.arr().write(|w| w.set_arr(ticks as u16));
    }

    fn force_reload(&mut self) {
        self.timer.egr().write(|w| w.set_ug(true));
    }

    fn start_dma(&mut self, samples: &[u16]) {
        let stream = self.stream();
        stream.ndtr().write(|w| w.set_ndt(samples.len() as u16));
        stream
            .par()
            .write_value(pac::DAC1.dhr12r(self.dac_channel).as_ptr() as u32);
        stream.m0ar().write_value(samples.as_ptr() as u32);
        stream.cr().write(|w| {
            w.set_chsel(DAC_DMA_REQUEST);
            w.set_dir(pac::dma::vals::Dir::MEMORY_TO_PERIPHERAL);
            w.set_minc(true);
            w.set_msize(pac::dma::vals::Size::BITS16);
            w.set_psize(pac::dma::vals::Size::BITS16);
            w.set_circ(true);
            w.set_pl(pac::dma::vals::Pl::HIGH);
            w.set_en(true);
        });
        pac::DAC1.cr().modify(|w| {
            w.set_dmaen(self.dac_channel, true);
            w.set_en(self.dac_channel, true);
        });
    }

    fn start_timer(&mut self) {
        self.timer.cr1().modify(|w| w.set_cen(true));
    }
}

// ── Digital (PWM) outputs ────────────────────────────────────────────

/// One general-purpose timer compare channel in PWM mode.
pub struct PwmOut {
    timer: pac::timer::TimGp32,
    /// Compare channel index, 0-based.
    channel: usize,
    clock_hz: u32,
}

impl PwmOut {
    /// Generator channel 2: TIM5 channel 4.
    pub fn tim5_ch4(clock_hz: u32) -> Self {
        Self {
            timer: pac::TIM5,
            channel: 3,
            clock_hz,
        }
    }

    /// Generator channel 3: TIM2 channel 3.
    pub fn tim2_ch3(clock_hz: u32) -> Self {
        Self {
            timer: pac::TIM2,
            channel: 2,
            clock_hz,
        }
    }
}

impl PwmOutput for PwmOut {
    fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn set_period(&mut self, ticks: u32) {
        self.timer.arr().write(|w| w.set_arr(ticks));
    }

    fn set_compare(&mut self, ticks: u32) {
        self.timer.ccr(self.channel).write(|w| w.set_ccr(ticks));
    }

    fn force_reload(&mut self) {
        self.timer.egr().write(|w| w.set_ug(true));
    }

    fn start(&mut self) {
        self.timer.ccer().modify(|w| w.set_cce(self.channel, true));
        self.timer.cr1().modify(|w| w.set_cen(true));
    }
}

//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions and the fan LEDC timer/channel using raw
//! ESP-IDF sys calls, then hands out thin `embedded-hal` handles over the
//! configured peripherals.  Called once from `main()` before the control
//! loop starts.
//!
//! On non-espidf targets every handle is a simulation stub: writes are
//! dropped, reads return low, delays return immediately.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as DigitalErrorType, InputPin, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use crate::config::TrapConfig;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcTimerFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

/// Handles to every configured peripheral.
pub struct Peripherals {
    pub trigger: GpioOutput,
    pub echo: GpioInput,
    pub uv_enable: GpioOutput,
    pub fan_pwm: LedcChannel,
    pub delay: RomDelay,
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &TrapConfig) -> Result<Peripherals, HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
        init_ledc(config)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(handles(config))
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(config: &TrapConfig) -> Result<Peripherals, HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(handles(config))
}

fn handles(config: &TrapConfig) -> Peripherals {
    Peripherals {
        trigger: GpioOutput(pins::ULTRASONIC_TRIG_GPIO),
        echo: GpioInput(pins::ULTRASONIC_ECHO_GPIO),
        uv_enable: GpioOutput(pins::UV_ENABLE_GPIO),
        fan_pwm: LedcChannel {
            channel: pins::FAN_LEDC_CHANNEL,
            max_duty: config.fan_duty_max(),
        },
        delay: RomDelay,
    }
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [pins::ULTRASONIC_TRIG_GPIO, pins::UV_ENABLE_GPIO];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (trig, uv)");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Echo is actively driven by the sensor; no pull.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ULTRASONIC_ECHO_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: GPIO inputs configured (echo)");
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(config: &TrapConfig) -> Result<(), HwInitError> {
    // Timer 0: fan (5 kHz, 10-bit by default)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: config.fan_pwm_resolution_bits,
        freq_hz: config.fan_pwm_freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcTimerFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: pins::FAN_LEDC_CHANNEL,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::FAN_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcChannelFailed(ret));
    }

    info!(
        "hw_init: LEDC configured (fan=CH{}, {} Hz, {}-bit)",
        pins::FAN_LEDC_CHANNEL,
        config.fan_pwm_freq_hz,
        config.fan_pwm_resolution_bits
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
//  embedded-hal handles
// ═══════════════════════════════════════════════════════════════

/// Push-pull output configured by [`init_peripherals`].
pub struct GpioOutput(i32);

impl DigitalErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        gpio_write(self.0, false);
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        gpio_write(self.0, true);
        Ok(())
    }
}

/// Floating input configured by [`init_peripherals`].
pub struct GpioInput(i32);

impl DigitalErrorType for GpioInput {
    type Error = Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(gpio_read(self.0))
    }
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!gpio_read(self.0))
    }
}

/// Fan LEDC channel.  Duty is in raw counts at the timer resolution.
pub struct LedcChannel {
    channel: u32,
    max_duty: u16,
}

impl PwmErrorType for LedcChannel {
    type Error = Infallible;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }
    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        ledc_set(self.channel, duty.min(self.max_duty));
        Ok(())
    }
}

/// Busy-wait delay on the ROM `esp_rom_delay_us` routine.
pub struct RomDelay;

impl DelayNs for RomDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1_000));
    }

    #[cfg(target_os = "espidf")]
    fn delay_us(&mut self, us: u32) {
        // SAFETY: ROM routine, busy-waits on the CPU cycle counter.
        unsafe { esp_rom_delay_us(us) };
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_us(&mut self, _us: u32) {}
}

// ── Raw register access ───────────────────────────────────────

#[cfg(target_os = "espidf")]
fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was configured during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
fn gpio_write(_pin: i32, _high: bool) {}

#[cfg(target_os = "espidf")]
fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on a configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
fn gpio_read(_pin: i32) -> bool {
    false
}

#[cfg(target_os = "espidf")]
fn ledc_set(channel: u32, duty: u16) {
    // SAFETY: the channel was configured in init_ledc(); only the main
    // loop writes duty registers.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
fn ledc_set(_channel: u32, _duty: u16) {}

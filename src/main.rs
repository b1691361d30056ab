//! SmartTrap Firmware — Main Entry Point
//!
//! Hexagonal architecture with a polled, clock-driven control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LogEventSink   LogDelivery   Esp32Time     │
//! │  (Ranging+Actuator) (EventSink)    (Delivery)    (ClockPort)   │
//! │  WifiAdapter                                                   │
//! │  (Connectivity)                                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  classify · decide · apply · report                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  CycleScheduler (delegate-driven, 30 s period)                 │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use embassy_time::{Duration, Instant};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;
use log::{debug, info, warn};

use smarttrap::adapters::hardware::HardwareAdapter;
use smarttrap::adapters::log_delivery::LogDelivery;
use smarttrap::adapters::log_sink::LogEventSink;
use smarttrap::adapters::time::Esp32TimeAdapter;
use smarttrap::adapters::wifi::WifiAdapter;
use smarttrap::app::ports::{
    ActuatorPort, ClockPort, ConnectivityPort, DeliveryPort, EventSink, RangingPort,
    SchedulerDelegate,
};
use smarttrap::app::service::AppService;
use smarttrap::config::TrapConfig;
use smarttrap::drivers::fan::FanDriver;
use smarttrap::drivers::hw_init;
use smarttrap::drivers::uv_lure::UvLureDriver;
use smarttrap::scheduler::CycleScheduler;
use smarttrap::sensors::ultrasonic::{RangingParams, UltrasonicSensor};

/// Upper bound on one idle sleep between loop iterations.
const LOOP_IDLE_MAX: Duration = Duration::from_millis(500);

// ── Scheduler delegate ────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about the service) to
// `AppService::run_cycle`.  Rebuilt every loop iteration so the WiFi
// adapter is free to be polled mutably in between.

struct CycleDelegate<'a, H, N, D, S> {
    app: &'a mut AppService,
    hw: &'a mut H,
    net: &'a N,
    delivery: &'a mut D,
    sink: &'a mut S,
}

impl<H, N, D, S> SchedulerDelegate for CycleDelegate<'_, H, N, D, S>
where
    H: RangingPort + ActuatorPort,
    N: ConnectivityPort,
    D: DeliveryPort,
    S: EventSink,
{
    fn on_cycle_due(&mut self, now: Instant) {
        let outcome = self
            .app
            .run_cycle(now, self.hw, self.net, self.delivery, self.sink);
        debug!("Cycle {}: {:?}", self.app.cycle_count(), outcome);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SmartTrap v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = TrapConfig::default();
    if let Some(ssid) = option_env!("SMARTTRAP_WIFI_SSID") {
        config.wifi_ssid = ssid.try_into().ok().context("SMARTTRAP_WIFI_SSID too long")?;
    }
    if let Some(password) = option_env!("SMARTTRAP_WIFI_PASSWORD") {
        config.wifi_password = password
            .try_into()
            .ok()
            .context("SMARTTRAP_WIFI_PASSWORD too long")?;
    }
    config.validate()?;

    // ── 3. Hardware peripherals ───────────────────────────────
    let p = hw_init::init_peripherals(&config).map_err(smarttrap::error::Error::from)?;
    let mut hw = HardwareAdapter::new(
        UltrasonicSensor::new(
            p.trigger,
            p.echo,
            p.delay,
            Esp32TimeAdapter::new(),
            RangingParams::from_config(&config),
        ),
        FanDriver::new(p.fan_pwm, config.fan_duty_max()),
        UvLureDriver::new(p.uv_enable),
    );

    let clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();
    let mut delivery = LogDelivery::new();

    // ── 4. Safe state before the network comes up ─────────────
    let mut app = AppService::new(&config);
    app.start(&mut hw, &mut log_sink);

    // ── 5. WiFi station ───────────────────────────────────────
    let esp = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let driver = EspWifi::new(esp.modem, sysloop, Some(nvs))?;

    let mut wifi = WifiAdapter::new();
    wifi.attach_driver(driver);
    match wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        Ok(()) => {
            if let Err(e) = wifi.connect(clock.now()) {
                warn!("WiFi: initial connect failed ({}), retrying in background", e);
            }
        }
        Err(e) => warn!("WiFi: {}, running offline", smarttrap::error::Error::from(e)),
    }

    // ── 6. Control loop ───────────────────────────────────────
    let mut sched = CycleScheduler::from_config(&config, clock.now());
    info!("System ready. Entering control loop.");

    loop {
        wifi.poll(clock.now());

        let mut cycle = CycleDelegate {
            app: &mut app,
            hw: &mut hw,
            net: &wifi,
            delivery: &mut delivery,
            sink: &mut log_sink,
        };
        sched.tick(&clock, &mut cycle);

        let idle = sched.time_until_due(clock.now()).min(LOOP_IDLE_MAX);
        FreeRtos::delay_ms(idle.as_millis().max(1) as u32);
    }
}

//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(s) => {
                info!(
                    "START | fan={} uv={} status={}",
                    s.fan,
                    if s.uv_on { "ON" } else { "OFF" },
                    s.fullness
                );
            }
            AppEvent::Measured {
                distance_mm,
                fullness,
            } => {
                info!("SENSE | distance={:.1}mm status={}", distance_mm, fullness);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
            AppEvent::ModeHeld(mode) => {
                info!("MODE  | offline, holding {}", mode);
            }
            AppEvent::Reported(p) => {
                info!(
                    "TELEM | fan={} trap={} last_updated={}ms",
                    p.fan_speed, p.trap_status, p.last_updated
                );
            }
            AppEvent::ReportFailed(e) => {
                warn!("TELEM | delivery failed: {}", e);
            }
        }
    }
}

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
            AppEvent::Status(s) => {
                info!(
                    "STATUS | state={} for {}s ({} transitions) | up={}s ticks={} | \
                     defeats={} (failed={}) panics={} | gestures={} | sensor_faults={} | lid={:.0}%",
                    s.state.name(),
                    s.ms_in_state / 1_000,
                    s.transitions,
                    s.uptime_ms / 1_000,
                    s.ticks,
                    s.switch_defeats,
                    s.failed_defeats,
                    s.panics,
                    s.gestures,
                    s.sensor_faults,
                    s.lid_open_percent,
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::SwitchChanged { on } => {
                info!("SWITCH | {}", if *on { "on" } else { "off" });
            }
            AppEvent::ProximityChanged { from, to } => {
                info!("PROX | {} -> {}", from.label(), to.label());
            }
            AppEvent::SwitchDefeat {
                style,
                attempts,
                switched_off,
                escalated,
            } => {
                if *switched_off {
                    info!(
                        "DEFEAT | {} | switch off after {} attempt(s){}",
                        style.name(),
                        attempts,
                        if *escalated { " (panicked)" } else { "" }
                    );
                } else {
                    warn!(
                        "DEFEAT | {} | switch not confirmed off after {} attempt(s)",
                        style.name(),
                        attempts
                    );
                }
            }
            AppEvent::GesturePlayed(g) => {
                info!("GESTURE | {}", g.name());
            }
            AppEvent::HandIgnored => {
                info!("IGNORE | hand very close");
            }
            AppEvent::InactivityClose { idle_ms } => {
                info!("IDLE | closing after {} ms", idle_ms);
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | {}", e);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}

//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the per-start log file. A future network sink would implement the
//! same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | controller ready");
            }
            AppEvent::GoalScored { side } => {
                info!("GOAL  | side={}", side.wire_constant());
            }
            AppEvent::BridgeFailed { side } => {
                info!("GOAL  | side={} bridge failed, not counted on display", side.wire_constant());
            }
            AppEvent::ResetRequested => {
                info!("RESET | reboot imminent");
            }
            AppEvent::ShuttingDown => {
                info!("EXIT  | shutting down without reboot");
            }
        }
    }
}

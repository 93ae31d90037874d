//! Outbound application events.
//!
//! The [`TableService`](super::service::TableService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. The production adapter
//! writes them to the log file; tests assert on them directly.

use crate::events::TableSide;

/// Structured events emitted by the table core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller finished startup and is accepting edges.
    Started,

    /// A goal was counted and relayed to the display.
    GoalScored { side: TableSide },

    /// A goal edge was seen but the bridge reported failure;
    /// the LED was turned back off without a confirmation blink.
    BridgeFailed { side: TableSide },

    /// The reset button was pressed; a reboot will follow.
    ResetRequested,

    /// The controller is cleaning up without rebooting.
    ShuttingDown,
}

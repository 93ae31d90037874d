//! Interrupt-to-main-loop event path.
//!
//! Events are produced by the per-pin GPIO interrupt threads (and the
//! signal-handler thread) and consumed by the single main loop:
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ goal ISR threads │────▶│              │     │              │
//! │ reset ISR thread │────▶│   EventBus   │────▶│  Main Loop   │
//! │ signal thread    │────▶│   (mpsc)     │     │  (consumer)  │
//! └──────────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Goal events are admission-controlled *before* they enter the channel:
//! the producer must already hold the goal guard (see
//! [`GoalGuard`](crate::app::service::GoalGuard)), so a goal that arrives
//! while a flash sequence is running is dropped, never queued.

use std::sync::mpsc::{self, Receiver, SendError, Sender};

// ---------------------------------------------------------------------------
// Table side
// ---------------------------------------------------------------------------

/// Which half of the table an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableSide {
    Side1,
    Side2,
}

impl TableSide {
    /// Both sides, in display order.
    pub const BOTH: [Self; 2] = [Self::Side1, Self::Side2];

    /// The string constant the scoring display expects on the wire.
    pub const fn wire_constant(self) -> &'static str {
        match self {
            Self::Side1 => "SIDE_1",
            Self::Side2 => "SIDE_2",
        }
    }

    /// Numeric side index (0 or 1).
    pub const fn index(self) -> u8 {
        match self {
            Self::Side1 => 0,
            Self::Side2 => 1,
        }
    }

    /// The side at the given index.
    pub const fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Side1),
            1 => Some(Self::Side2),
            _ => None,
        }
    }

    /// The opposing side.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Side1 => Self::Side2,
            Self::Side2 => Self::Side1,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Hardware and lifecycle events consumed by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    /// A goal button saw a falling edge and won the goal guard.
    Goal(TableSide),
    /// The reset button saw a falling edge.
    Reset,
    /// SIGINT/SIGTERM — clean up and exit without rebooting.
    Shutdown,
}

// ---------------------------------------------------------------------------
// Event bus
// ---------------------------------------------------------------------------

/// Producer half of the event path. Clone one per interrupt thread.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: Sender<TableEvent>,
}

impl EventBus {
    /// Publish an event. Returns `false` when the consumer is gone
    /// (the main loop already exited) — producers treat that as a drop.
    pub fn publish(&self, event: TableEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(SendError(dropped)) => {
                log::debug!("event {:?} dropped, main loop gone", dropped);
                false
            }
        }
    }
}

/// Create the event channel: one bus handle for producers, one receiver
/// for the main loop.
pub fn event_channel() -> (EventBus, Receiver<TableEvent>) {
    let (tx, rx) = mpsc::channel();
    (EventBus { tx }, rx)
}

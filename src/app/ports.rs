//! Port traits — the boundary between table logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TableService (domain)
//! ```
//!
//! Driven adapters (GPIO, shell bridge, reboot, event sinks) implement
//! these traits. The [`TableService`](super::service::TableService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and the whole service runs against mocks on the host.

use std::time::Duration;

use crate::error::BridgeError;
use crate::events::TableSide;

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the two goal indicator LEDs.
///
/// Implementations own the active-low polarity of the board; callers speak
/// logical ON/OFF only. `blink` is synchronous and blocks the caller for
/// `interval * repeats * 2` — there is deliberately no cancellation.
pub trait IndicatorPort {
    /// Turn one side's LED on.
    fn led_on(&mut self, side: TableSide);

    /// Turn one side's LED off.
    fn led_off(&mut self, side: TableSide);

    /// Blocking blink: ON, sleep, OFF, sleep, `repeats` times.
    /// Every listed side toggles together. Ends with the LEDs off.
    fn blink(&mut self, interval: Duration, repeats: u32, sides: &[TableSide]);

    /// Both LEDs off — safe cleanup state.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Bridge port (domain → scoring display)
// ───────────────────────────────────────────────────────────────

/// The shell-invoked bridge to the scoring display device.
pub trait BridgePort {
    /// One-shot device discovery at startup. Failure is reported to the
    /// caller but is never fatal — the table keeps running and each goal
    /// retries the broadcast on its own.
    fn discover_device(&mut self) -> Result<(), BridgeError>;

    /// Relay one goal to the display. Blocks until the bridge process
    /// exits; no timeout. `Ok` means the update counts as delivered —
    /// see `BridgeConfig::strict_exit_status` for what that covers.
    fn update_score(&mut self, side: TableSide) -> Result<(), BridgeError>;
}

// ───────────────────────────────────────────────────────────────
// System port (domain → OS)
// ───────────────────────────────────────────────────────────────

/// Whole-machine actions.
pub trait SystemPort {
    /// Issue the OS reboot command. No confirmation, no graceful
    /// shutdown of anything else; failures are logged by the adapter.
    fn reboot(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go — the log file in
/// production, a recording vector in tests.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

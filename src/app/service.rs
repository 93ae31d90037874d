//! Application service — the table core.
//!
//! [`TableService`] owns the goal guard and interprets
//! [`TableEvent`](crate::events::TableEvent)s. All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  goal/reset edges ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                       │      TableService        │
//!     IndicatorPort ◀───│  guard · blink · bridge  │──▶ BridgePort
//!        SystemPort ◀───└─────────────────────────┘
//! ```
//!
//! ## Goal admission
//!
//! Goal edges arrive on per-pin interrupt threads, in parallel. The guard
//! is claimed with a compare-exchange *on the interrupt thread*, before the
//! event enters the channel: an edge that loses the exchange is dropped on
//! the spot. Queueing it instead would replay stale goals after the flash
//! sequence ends.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::TableConfig;
use crate::events::{EventBus, TableEvent, TableSide};

use super::events::AppEvent;
use super::ports::{BridgePort, EventSink, IndicatorPort, SystemPort};

// ───────────────────────────────────────────────────────────────
// Goal guard
// ───────────────────────────────────────────────────────────────

/// Re-entrancy guard for goal handling: set while a flash sequence is in
/// progress. Cloned into each goal pin's interrupt callback.
#[derive(Debug, Clone)]
pub struct GoalGuard {
    flashing: Arc<AtomicBool>,
}

impl GoalGuard {
    pub fn new() -> Self {
        Self {
            flashing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Try to claim the guard. Exactly one of any number of concurrent
    /// claims succeeds; the rest observe `false` and must drop their edge.
    pub fn claim(&self) -> bool {
        self.flashing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the guard. Idempotent.
    pub fn release(&self) {
        self.flashing.store(false, Ordering::Release);
    }

    /// Whether a flash sequence is currently in progress.
    pub fn is_flashing(&self) -> bool {
        self.flashing.load(Ordering::Acquire)
    }

    /// Producer-side entry point, called on a goal falling edge from the
    /// interrupt thread. Claims the guard and publishes the event; returns
    /// `false` when the edge was dropped (flash in progress, or the main
    /// loop is gone).
    pub fn admit_goal(&self, bus: &EventBus, side: TableSide) -> bool {
        if !self.claim() {
            debug!(
                "goal edge on {} dropped, flash in progress",
                side.wire_constant()
            );
            return false;
        }
        if !bus.publish(TableEvent::Goal(side)) {
            self.release();
            return false;
        }
        true
    }
}

impl Default for GoalGuard {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Loop exit
// ───────────────────────────────────────────────────────────────

/// Why [`TableService::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Reset pressed: blink done, reboot command already issued.
    Reboot,
    /// Explicit shutdown signal: LEDs off, no reboot.
    Shutdown,
    /// Every producer hung up: LEDs off, no reboot.
    ChannelClosed,
}

// ───────────────────────────────────────────────────────────────
// TableService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all table logic.
pub struct TableService {
    guard: GoalGuard,
    config: TableConfig,
}

impl TableService {
    pub fn new(config: TableConfig) -> Self {
        Self {
            guard: GoalGuard::new(),
            config,
        }
    }

    /// A handle to the goal guard for the interrupt callbacks.
    pub fn guard(&self) -> GoalGuard {
        self.guard.clone()
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Startup self-test: blink both LEDs so a miswired or dead LED is
    /// visible before the first goal, then announce readiness.
    pub fn start(&self, hw: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        let blink = &self.config.blink;
        hw.blink(
            Duration::from_millis(blink.startup_interval_ms),
            blink.startup_repeats,
            &TableSide::BOTH,
        );
        sink.emit(&AppEvent::Started);
        info!("table controller ready, waiting for goals");
    }

    // ── Goal handling ─────────────────────────────────────────

    /// Run one goal sequence. The interrupt path already claimed the guard
    /// via [`GoalGuard::admit_goal`]; this method releases it when the
    /// sequence ends, success or not.
    ///
    /// The bridge call is synchronous and unbounded — while it runs, the
    /// guard stays held and every other edge is dropped.
    pub fn handle_goal(
        &mut self,
        side: TableSide,
        hw: &mut impl IndicatorPort,
        bridge: &mut impl BridgePort,
        sink: &mut impl EventSink,
    ) {
        hw.led_on(side);

        match bridge.update_score(side) {
            Ok(()) => {
                info!("goal on {} relayed to display", side.wire_constant());
                sink.emit(&AppEvent::GoalScored { side });
                let blink = &self.config.blink;
                hw.blink(
                    Duration::from_millis(blink.goal_interval_ms),
                    blink.goal_repeats,
                    &[side],
                );
            }
            Err(e) => {
                warn!("score update for {} failed: {}", side.wire_constant(), e);
                sink.emit(&AppEvent::BridgeFailed { side });
                hw.led_off(side);
            }
        }

        self.guard.release();
    }

    // ── Main loop ─────────────────────────────────────────────

    /// Consume events until reset or shutdown.
    ///
    /// Reset: fast-blink both LEDs, issue the reboot command exactly once,
    /// return. Shutdown or a closed channel: LEDs off, pins left for the
    /// adapters to release, **no** reboot.
    pub fn run(
        &mut self,
        events: &Receiver<TableEvent>,
        hw: &mut impl IndicatorPort,
        bridge: &mut impl BridgePort,
        system: &mut impl SystemPort,
        sink: &mut impl EventSink,
    ) -> LoopExit {
        loop {
            match events.recv() {
                Ok(TableEvent::Goal(side)) => {
                    self.handle_goal(side, hw, bridge, sink);
                }
                Ok(TableEvent::Reset) => {
                    info!("reset pressed, rebooting table");
                    sink.emit(&AppEvent::ResetRequested);
                    let blink = &self.config.blink;
                    hw.blink(
                        Duration::from_millis(blink.reset_interval_ms),
                        blink.reset_repeats,
                        &TableSide::BOTH,
                    );
                    system.reboot();
                    return LoopExit::Reboot;
                }
                Ok(TableEvent::Shutdown) => {
                    info!("shutdown signal, cleaning up without reboot");
                    sink.emit(&AppEvent::ShuttingDown);
                    hw.all_off();
                    return LoopExit::Shutdown;
                }
                Err(_) => {
                    warn!("event channel closed unexpectedly, cleaning up without reboot");
                    sink.emit(&AppEvent::ShuttingDown);
                    hw.all_off();
                    return LoopExit::ChannelClosed;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_channel;

    #[test]
    fn claim_is_exclusive_until_release() {
        let guard = GoalGuard::new();
        assert!(guard.claim());
        assert!(!guard.claim());
        guard.release();
        assert!(guard.claim());
    }

    #[test]
    fn release_is_idempotent() {
        let guard = GoalGuard::new();
        guard.release();
        guard.release();
        assert!(guard.claim());
    }

    #[test]
    fn admit_goal_drops_while_flashing() {
        let (bus, rx) = event_channel();
        let guard = GoalGuard::new();

        assert!(guard.admit_goal(&bus, TableSide::Side1));
        assert!(!guard.admit_goal(&bus, TableSide::Side2));

        assert_eq!(rx.try_recv().unwrap(), TableEvent::Goal(TableSide::Side1));
        assert!(rx.try_recv().is_err(), "second goal must not be queued");
    }

    #[test]
    fn admit_goal_releases_when_consumer_gone() {
        let (bus, rx) = event_channel();
        drop(rx);
        let guard = GoalGuard::new();
        assert!(!guard.admit_goal(&bus, TableSide::Side1));
        assert!(!guard.is_flashing(), "guard must not stay claimed on a dead bus");
    }

    #[test]
    fn concurrent_claims_admit_exactly_one() {
        let guard = GoalGuard::new();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let g = guard.clone();
            handles.push(std::thread::spawn(move || g.claim()));
        }
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Claim/release in any order: a claim succeeds exactly when the
        /// guard is idle, and the guard state always mirrors the last op.
        #[test]
        fn guard_tracks_claim_release_sequences(ops in proptest::collection::vec(any::<bool>(), 1..64)) {
            let guard = GoalGuard::new();
            let mut held = false;
            for claim in ops {
                if claim {
                    let won = guard.claim();
                    prop_assert_eq!(won, !held);
                    held = true;
                } else {
                    guard.release();
                    held = false;
                }
                prop_assert_eq!(guard.is_flashing(), held);
            }
        }
    }
}

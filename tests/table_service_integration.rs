//! Integration tests: TableService → ports pipeline.
//!
//! These verify the full chain from a goal/reset edge down to LED, bridge,
//! and reboot calls. All tests run on the host against mock adapters that
//! record every port call — no real GPIO, no spawned bridge processes.

use std::collections::VecDeque;
use std::time::Duration;

use foostable::app::events::AppEvent;
use foostable::app::ports::{BridgePort, EventSink, IndicatorPort, SystemPort};
use foostable::app::service::{LoopExit, TableService};
use foostable::config::TableConfig;
use foostable::error::BridgeError;
use foostable::events::{TableEvent, TableSide, event_channel};

// ── Mock adapters ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum IndicatorCall {
    LedOn(TableSide),
    LedOff(TableSide),
    Blink {
        interval: Duration,
        repeats: u32,
        sides: Vec<TableSide>,
    },
    AllOff,
}

#[derive(Default)]
struct MockIndicator {
    calls: Vec<IndicatorCall>,
}

impl MockIndicator {
    fn new() -> Self {
        Self::default()
    }

    /// Final logical state of one LED after replaying the call history.
    /// A blink sequence always ends with its LEDs off.
    fn led_lit(&self, side: TableSide) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                IndicatorCall::LedOn(s) if *s == side => Some(true),
                IndicatorCall::LedOff(s) if *s == side => Some(false),
                IndicatorCall::Blink { sides, .. } if sides.contains(&side) => Some(false),
                IndicatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn blink_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, IndicatorCall::Blink { .. }))
            .count()
    }
}

impl IndicatorPort for MockIndicator {
    fn led_on(&mut self, side: TableSide) {
        self.calls.push(IndicatorCall::LedOn(side));
    }

    fn led_off(&mut self, side: TableSide) {
        self.calls.push(IndicatorCall::LedOff(side));
    }

    fn blink(&mut self, interval: Duration, repeats: u32, sides: &[TableSide]) {
        self.calls.push(IndicatorCall::Blink {
            interval,
            repeats,
            sides: sides.to_vec(),
        });
    }

    fn all_off(&mut self) {
        self.calls.push(IndicatorCall::AllOff);
    }
}

struct MockBridge {
    /// Scripted results for successive `update_score` calls;
    /// once exhausted, every call succeeds.
    script: VecDeque<Result<(), BridgeError>>,
    updates: Vec<TableSide>,
}

impl MockBridge {
    fn new() -> Self {
        Self {
            script: VecDeque::new(),
            updates: Vec::new(),
        }
    }

    fn failing(err: BridgeError) -> Self {
        let mut bridge = Self::new();
        bridge.script.push_back(Err(err));
        bridge
    }
}

impl BridgePort for MockBridge {
    fn discover_device(&mut self) -> Result<(), BridgeError> {
        Ok(())
    }

    fn update_score(&mut self, side: TableSide) -> Result<(), BridgeError> {
        self.updates.push(side);
        self.script.pop_front().unwrap_or(Ok(()))
    }
}

#[derive(Default)]
struct MockSystem {
    reboots: u32,
}

impl MockSystem {
    fn new() -> Self {
        Self::default()
    }
}

impl SystemPort for MockSystem {
    fn reboot(&mut self) {
        self.reboots += 1;
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<AppEvent>,
}

impl RecordingSink {
    fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

fn make_service() -> (TableService, MockIndicator, MockBridge, RecordingSink) {
    let service = TableService::new(TableConfig::default());
    (
        service,
        MockIndicator::new(),
        MockBridge::new(),
        RecordingSink::new(),
    )
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_runs_self_test_on_both_leds() {
    let (service, mut hw, _bridge, mut sink) = make_service();

    service.start(&mut hw, &mut sink);

    let config = TableConfig::default();
    assert_eq!(
        hw.calls,
        vec![IndicatorCall::Blink {
            interval: Duration::from_millis(config.blink.startup_interval_ms),
            repeats: config.blink.startup_repeats,
            sides: TableSide::BOTH.to_vec(),
        }]
    );
    assert_eq!(sink.events, vec![AppEvent::Started]);
}

// ── Goal while idle ───────────────────────────────────────────

#[test]
fn goal_lights_one_led_invokes_bridge_and_returns_to_idle() {
    let (mut service, mut hw, mut bridge, mut sink) = make_service();
    let guard = service.guard();

    assert!(guard.claim());
    service.handle_goal(TableSide::Side1, &mut hw, &mut bridge, &mut sink);

    assert_eq!(bridge.updates, vec![TableSide::Side1]);
    assert_eq!(hw.calls[0], IndicatorCall::LedOn(TableSide::Side1));
    assert!(!guard.is_flashing(), "guard must return to idle");
    assert_eq!(
        sink.events,
        vec![AppEvent::GoalScored { side: TableSide::Side1 }]
    );
}

#[test]
fn successful_goal_blinks_only_the_scoring_side() {
    for side in TableSide::BOTH {
        let (mut service, mut hw, mut bridge, mut sink) = make_service();
        let guard = service.guard();

        assert!(guard.claim());
        service.handle_goal(side, &mut hw, &mut bridge, &mut sink);

        let config = TableConfig::default();
        assert_eq!(
            hw.calls,
            vec![
                IndicatorCall::LedOn(side),
                IndicatorCall::Blink {
                    interval: Duration::from_millis(config.blink.goal_interval_ms),
                    repeats: config.blink.goal_repeats,
                    sides: vec![side],
                },
            ]
        );
        assert!(!hw.led_lit(side), "blink ends with the LED off");
        assert!(!hw.led_lit(side.opponent()), "other side untouched");
    }
}

// ── Goal while flashing ───────────────────────────────────────

#[test]
fn goal_during_flash_has_no_observable_effect() {
    let (mut service, mut hw, mut bridge, mut sink) = make_service();
    let guard = service.guard();
    let (bus, events) = event_channel();

    // First edge wins the guard; the second is dropped at admission,
    // before it can ever reach the channel.
    assert!(guard.admit_goal(&bus, TableSide::Side1));
    assert!(!guard.admit_goal(&bus, TableSide::Side2));

    drop(bus);
    let mut system = MockSystem::new();
    let exit = service.run(&events, &mut hw, &mut bridge, &mut system, &mut sink);

    assert_eq!(exit, LoopExit::ChannelClosed);
    assert_eq!(bridge.updates, vec![TableSide::Side1]);
    assert!(
        !hw.calls.contains(&IndicatorCall::LedOn(TableSide::Side2)),
        "dropped goal must not touch its LED"
    );
}

// ── Bridge failure ────────────────────────────────────────────

#[test]
fn bridge_failure_turns_led_off_without_blink() {
    let (mut service, mut hw, _, mut sink) = make_service();
    let mut bridge = MockBridge::failing(BridgeError::SpawnFailed);
    let guard = service.guard();

    assert!(guard.claim());
    service.handle_goal(TableSide::Side2, &mut hw, &mut bridge, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            IndicatorCall::LedOn(TableSide::Side2),
            IndicatorCall::LedOff(TableSide::Side2),
        ]
    );
    assert_eq!(hw.blink_count(), 0, "no confirmation blink on failure");
    assert!(!guard.is_flashing(), "guard released on the failure path too");
    assert_eq!(
        sink.events,
        vec![AppEvent::BridgeFailed { side: TableSide::Side2 }]
    );
}

// ── Reset ─────────────────────────────────────────────────────

#[test]
fn reset_blinks_both_leds_then_reboots_exactly_once() {
    let (mut service, mut hw, mut bridge, mut sink) = make_service();
    let (bus, events) = event_channel();
    let mut system = MockSystem::new();

    assert!(bus.publish(TableEvent::Reset));
    let exit = service.run(&events, &mut hw, &mut bridge, &mut system, &mut sink);

    assert_eq!(exit, LoopExit::Reboot);
    assert_eq!(system.reboots, 1);

    let config = TableConfig::default();
    assert_eq!(
        hw.calls,
        vec![IndicatorCall::Blink {
            interval: Duration::from_millis(config.blink.reset_interval_ms),
            repeats: config.blink.reset_repeats,
            sides: TableSide::BOTH.to_vec(),
        }]
    );
    assert_eq!(sink.events, vec![AppEvent::ResetRequested]);
}

// ── Event-path failure / shutdown ─────────────────────────────

#[test]
fn closed_channel_cleans_up_without_reboot() {
    let (mut service, mut hw, mut bridge, mut sink) = make_service();
    let (bus, events) = event_channel();
    let mut system = MockSystem::new();

    drop(bus);
    let exit = service.run(&events, &mut hw, &mut bridge, &mut system, &mut sink);

    assert_eq!(exit, LoopExit::ChannelClosed);
    assert_eq!(system.reboots, 0, "reboot must never be issued on the error path");
    assert_eq!(hw.calls, vec![IndicatorCall::AllOff]);
    assert_eq!(sink.events, vec![AppEvent::ShuttingDown]);
}

#[test]
fn shutdown_signal_cleans_up_without_reboot() {
    let (mut service, mut hw, mut bridge, mut sink) = make_service();
    let (bus, events) = event_channel();
    let mut system = MockSystem::new();

    assert!(bus.publish(TableEvent::Shutdown));
    let exit = service.run(&events, &mut hw, &mut bridge, &mut system, &mut sink);

    assert_eq!(exit, LoopExit::Shutdown);
    assert_eq!(system.reboots, 0);
    assert_eq!(hw.calls, vec![IndicatorCall::AllOff]);
}

// ── Full sequences ────────────────────────────────────────────

#[test]
fn goal_then_reset_processes_in_order() {
    let (mut service, mut hw, mut bridge, mut sink) = make_service();
    let guard = service.guard();
    let (bus, events) = event_channel();
    let mut system = MockSystem::new();

    assert!(guard.admit_goal(&bus, TableSide::Side2));
    assert!(bus.publish(TableEvent::Reset));

    let exit = service.run(&events, &mut hw, &mut bridge, &mut system, &mut sink);

    assert_eq!(exit, LoopExit::Reboot);
    assert_eq!(bridge.updates, vec![TableSide::Side2]);
    assert_eq!(system.reboots, 1);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::GoalScored { side: TableSide::Side2 },
            AppEvent::ResetRequested,
        ]
    );
}

#[test]
fn guard_reopens_after_each_flash_sequence() {
    let (mut service, mut hw, mut bridge, mut sink) = make_service();
    let guard = service.guard();

    for _ in 0..3 {
        assert!(guard.claim(), "guard must reopen between goals");
        service.handle_goal(TableSide::Side1, &mut hw, &mut bridge, &mut sink);
    }
    assert_eq!(bridge.updates.len(), 3);
}

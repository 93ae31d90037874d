//! Foostable — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  LedBank/InputBank   ShellBridge    OsSystem    LogEventSink │
//! │  (IndicatorPort)     (BridgePort)   (SystemPort) (EventSink) │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            TableService (pure logic)                 │    │
//! │  │  goal guard · blink sequencing · reset/reboot        │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │                                                              │
//! │  EventBus (interrupt threads → main loop, mpsc)              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod logging;
pub mod pins;

pub mod app;
pub mod adapters;

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use log::{info, warn};

use adapters::gpio;
use adapters::log_sink::LogEventSink;
use adapters::shell_bridge::ShellBridge;
use adapters::system::OsSystem;
use app::ports::BridgePort;
use app::service::{LoopExit, TableService};
use config::TableConfig;
use events::{EventBus, TableEvent, event_channel};

fn main() -> Result<()> {
    // ── 1. Config, then logging (the log dir comes from config) ──
    let config = TableConfig::load().map_err(error::Error::from)?;
    let _log_guard = logging::init_logging(&config).context("logging init")?;
    diagnostics::install_panic_handler();

    info!("foostable v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Display device discovery (non-fatal) ───────────────
    let mut bridge = ShellBridge::new(config.bridge.clone());
    if let Err(e) = bridge.discover_device() {
        warn!("device discovery failed ({e}), display may be offline");
    }

    // ── 3. Claim GPIO lines — a failure here terminates ───────
    let (mut leds, mut inputs) = gpio::init(&config.pins)?;

    // ── 4. Event path: interrupts + signals → main loop ───────
    let (bus, events) = event_channel();
    let mut service = TableService::new(config.clone());
    gpio::register_interrupts(&mut inputs, &bus, &service.guard())?;
    spawn_signal_listener(bus);

    // ── 5. Self-test, then consume events until reset/shutdown ──
    let mut sink = LogEventSink::new();
    let mut system = OsSystem::new(config.reboot_command.clone());
    service.start(&mut leds, &mut sink);

    match service.run(&events, &mut leds, &mut bridge, &mut system, &mut sink) {
        LoopExit::Reboot => info!("reboot issued, exiting"),
        LoopExit::Shutdown => info!("clean shutdown"),
        LoopExit::ChannelClosed => warn!("event producers vanished, exiting"),
    }
    Ok(())
}

/// SIGINT/SIGTERM → `TableEvent::Shutdown`, so an operator stopping the
/// service gets the cleanup path rather than a reboot or dangling pins.
fn spawn_signal_listener(bus: EventBus) {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    std::thread::spawn(move || {
        let mut signals = match Signals::new([SIGINT, SIGTERM]) {
            Ok(s) => s,
            Err(e) => {
                log::error!("signal handler init failed: {e}");
                return;
            }
        };
        if signals.forever().next().is_some() {
            bus.publish(TableEvent::Shutdown);
        }
    });
}

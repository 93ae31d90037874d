//! Raspberry Pi GPIO adapter (rppal).
//!
//! Owns the five physical lines: two LED outputs and three button inputs.
//! All lines are active-low — see [`crate::pins`] for the logical mapping.
//! Inputs use the SoC pull-ups and fire on the falling edge; rppal
//! dispatches each pin's interrupt callback on its own thread, which is
//! why goal admission happens through [`GoalGuard::admit_goal`] rather
//! than in the main loop.
//!
//! rppal restores every pin to its original state on drop, so the
//! cleanup paths only need to switch the LEDs off before returning.

use std::time::Duration;

use log::{debug, error};
use rppal::gpio::{Event, Gpio, InputPin, Level as HwLevel, OutputPin, Trigger};

use crate::app::ports::IndicatorPort;
use crate::app::service::GoalGuard;
use crate::config::PinConfig;
use crate::error::{Error, GpioError, Result};
use crate::events::{EventBus, TableEvent, TableSide};
use crate::pins::{Electrical, Level};

fn hw_level(level: Level) -> HwLevel {
    match level.electrical() {
        Electrical::Low => HwLevel::Low,
        Electrical::High => HwLevel::High,
    }
}

fn gpio_error(bcm: u8, e: &rppal::gpio::Error) -> Error {
    error!("GPIO {bcm}: {e}");
    match e {
        rppal::gpio::Error::PinNotAvailable(_) => GpioError::PinUnavailable(bcm).into(),
        rppal::gpio::Error::PermissionDenied(_) => GpioError::PermissionDenied.into(),
        _ => GpioError::Io.into(),
    }
}

// ───────────────────────────────────────────────────────────────
// LED bank
// ───────────────────────────────────────────────────────────────

/// The two goal indicator LEDs.
pub struct LedBank {
    side1: OutputPin,
    side2: OutputPin,
}

impl LedBank {
    fn write(&mut self, side: TableSide, level: Level) {
        let pin = match side {
            TableSide::Side1 => &mut self.side1,
            TableSide::Side2 => &mut self.side2,
        };
        pin.write(hw_level(level));
    }
}

impl IndicatorPort for LedBank {
    fn led_on(&mut self, side: TableSide) {
        self.write(side, Level::On);
    }

    fn led_off(&mut self, side: TableSide) {
        self.write(side, Level::Off);
    }

    fn blink(&mut self, interval: Duration, repeats: u32, sides: &[TableSide]) {
        for _ in 0..repeats {
            for side in sides {
                self.write(*side, Level::On);
            }
            std::thread::sleep(interval);
            for side in sides {
                self.write(*side, Level::Off);
            }
            std::thread::sleep(interval);
        }
    }

    fn all_off(&mut self) {
        for side in TableSide::BOTH {
            self.write(side, Level::Off);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Input bank
// ───────────────────────────────────────────────────────────────

/// The three button inputs. Must stay alive for the interrupt threads to
/// keep running; dropping it unregisters the callbacks.
pub struct InputBank {
    goal_side1: InputPin,
    goal_side2: InputPin,
    reset: InputPin,
    pins: PinConfig,
}

/// Claim all five lines and put them in their startup state: LEDs off
/// (electrical high), inputs pulled up. Any failure here terminates
/// startup — there is nothing to clean up yet.
pub fn init(pins: &PinConfig) -> Result<(LedBank, InputBank)> {
    let gpio = Gpio::new().map_err(|e| {
        error!("GPIO device unavailable: {e}");
        Error::Gpio(GpioError::ChipUnavailable)
    })?;

    let output = |bcm: u8| -> Result<OutputPin> {
        // into_output_high = logical OFF on this active-low board.
        Ok(gpio.get(bcm).map_err(|e| gpio_error(bcm, &e))?.into_output_high())
    };
    let input = |bcm: u8| -> Result<InputPin> {
        Ok(gpio.get(bcm).map_err(|e| gpio_error(bcm, &e))?.into_input_pullup())
    };

    let leds = LedBank {
        side1: output(pins.led_side1)?,
        side2: output(pins.led_side2)?,
    };
    let inputs = InputBank {
        goal_side1: input(pins.goal_side1)?,
        goal_side2: input(pins.goal_side2)?,
        reset: input(pins.reset)?,
        pins: pins.clone(),
    };

    debug!(
        "GPIO configured: leds=({}, {}) goals=({}, {}) reset={}",
        pins.led_side1, pins.led_side2, pins.goal_side1, pins.goal_side2, pins.reset
    );
    Ok((leds, inputs))
}

/// Register the falling-edge callbacks.
///
/// No hardware debounce window is configured: the goal guard is the only
/// suppression the table has ever had, and adding one would change how
/// rapid double-presses score.
pub fn register_interrupts(
    inputs: &mut InputBank,
    bus: &EventBus,
    guard: &GoalGuard,
) -> Result<()> {
    let goals = [
        (&mut inputs.goal_side1, inputs.pins.goal_side1, TableSide::Side1),
        (&mut inputs.goal_side2, inputs.pins.goal_side2, TableSide::Side2),
    ];
    for (pin, bcm, side) in goals {
        let bus = bus.clone();
        let guard = guard.clone();
        pin.set_async_interrupt(Trigger::FallingEdge, None, move |_: Event| {
            guard.admit_goal(&bus, side);
        })
        .map_err(|e| {
            error!("GPIO {bcm}: {e}");
            Error::Gpio(GpioError::InterruptRegistration)
        })?;
    }

    let bus = bus.clone();
    let reset_bcm = inputs.pins.reset;
    inputs
        .reset
        .set_async_interrupt(Trigger::FallingEdge, None, move |_: Event| {
            bus.publish(TableEvent::Reset);
        })
        .map_err(|e| {
            error!("GPIO {reset_bcm}: {e}");
            Error::Gpio(GpioError::InterruptRegistration)
        })?;

    Ok(())
}

//! GPIO line assignments for the table controller board.
//!
//! Single source of truth — the config defaults and the GPIO adapter both
//! reference this module rather than hard-coding BCM numbers.
//!
//! ## Polarity
//!
//! The table is wired active-low on every line: LEDs sink current through
//! the pin (logical ON = electrical low) and the buttons short the line to
//! ground through a pull-up (pressed = falling edge). The logical/electrical
//! mapping lives here so no caller ever writes a raw level.

// ---------------------------------------------------------------------------
// Default BCM line numbers
// ---------------------------------------------------------------------------

/// Goal indicator LED, side 1 (output, active low).
pub const LED_SIDE1_GPIO: u8 = 23;
/// Goal indicator LED, side 2 (output, active low).
pub const LED_SIDE2_GPIO: u8 = 24;

/// Goal detection button, side 1 (input, pull-up, falling edge = goal).
pub const GOAL_SIDE1_GPIO: u8 = 17;
/// Goal detection button, side 2 (input, pull-up, falling edge = goal).
pub const GOAL_SIDE2_GPIO: u8 = 27;

/// Table reset button (input, pull-up, falling edge = reset + reboot).
pub const RESET_GPIO: u8 = 22;

// ---------------------------------------------------------------------------
// Logical / electrical level mapping
// ---------------------------------------------------------------------------

/// Logical level as the rest of the crate sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    On,
    Off,
}

/// Electrical level actually driven onto the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Electrical {
    Low,
    High,
}

impl Level {
    /// Translate a logical level to the electrical level for this board.
    /// The inversion is load-bearing: getting it backwards scores goals
    /// on button release and lights LEDs when idle.
    pub const fn electrical(self) -> Electrical {
        match self {
            Self::On => Electrical::Low,
            Self::Off => Electrical::High,
        }
    }
}

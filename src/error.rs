#![allow(dead_code)] // Some variants are constructed only by feature-gated adapters

//! Unified error types for the table controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level event loop's error handling uniform. Variants are `Copy` so
//! they can be passed around without allocation; the adapter that observed
//! the underlying OS error logs its full text before converting.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The score-update bridge command failed.
    Bridge(BridgeError),
    /// A GPIO operation failed.
    Gpio(GpioError),
    /// Startup initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bridge(e) => write!(f, "bridge: {e}"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Bridge errors
// ---------------------------------------------------------------------------

/// Failures of the shell-invoked score bridge, kept distinct from hardware
/// errors so the two are never conflated on the handler path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// The bridge process could not be spawned at all.
    SpawnFailed,
    /// The bridge process ran but exited with the given non-zero code.
    NonZeroExit(i32),
    /// The bridge process was killed by a signal before exiting.
    Terminated,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpawnFailed => write!(f, "command could not be spawned"),
            Self::NonZeroExit(code) => write!(f, "command exited with status {code}"),
            Self::Terminated => write!(f, "command terminated by signal"),
        }
    }
}

impl From<BridgeError> for Error {
    fn from(e: BridgeError) -> Self {
        Self::Bridge(e)
    }
}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// The GPIO character device could not be opened.
    ChipUnavailable,
    /// A requested line is already claimed or does not exist.
    PinUnavailable(u8),
    /// Insufficient permissions to access the GPIO device.
    PermissionDenied,
    /// Registering an edge interrupt failed.
    InterruptRegistration,
    /// Any other I/O failure from the GPIO layer.
    Io,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChipUnavailable => write!(f, "GPIO device unavailable"),
            Self::PinUnavailable(bcm) => write!(f, "GPIO {bcm} unavailable"),
            Self::PermissionDenied => write!(f, "GPIO permission denied"),
            Self::InterruptRegistration => write!(f, "interrupt registration failed"),
            Self::Io => write!(f, "GPIO I/O error"),
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured file does not exist.
    NotFound,
    /// The file exists but failed to parse.
    Corrupted,
    /// A field failed range validation; the string names the field.
    ValidationFailed(&'static str),
    /// I/O error while reading the file.
    Io,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config file not found"),
            Self::Corrupted => write!(f, "config file corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

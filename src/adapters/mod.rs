//! Driven adapters — implementations of the port traits.

pub mod log_sink;
pub mod shell_bridge;
pub mod system;

#[cfg(feature = "rpi")]
pub mod gpio;

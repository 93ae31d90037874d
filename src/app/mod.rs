//! Application core: service, ports, and outbound events.

pub mod events;
pub mod ports;
pub mod service;

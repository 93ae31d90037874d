//! Table controller configuration.
//!
//! All tunable parameters: GPIO line assignments, blink timings, the bridge
//! and reboot commands, and logging. Values can be overridden with a JSON
//! file pointed at by `FOOSTABLE_CONFIG`; with no file present the defaults
//! match the deployed table.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// GPIO line assignments (BCM numbering).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub led_side1: u8,
    pub led_side2: u8,
    pub goal_side1: u8,
    pub goal_side2: u8,
    pub reset: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            led_side1: pins::LED_SIDE1_GPIO,
            led_side2: pins::LED_SIDE2_GPIO,
            goal_side1: pins::GOAL_SIDE1_GPIO,
            goal_side2: pins::GOAL_SIDE2_GPIO,
            reset: pins::RESET_GPIO,
        }
    }
}

impl PinConfig {
    /// All five lines, for duplicate detection.
    fn lines(&self) -> [u8; 5] {
        [
            self.led_side1,
            self.led_side2,
            self.goal_side1,
            self.goal_side2,
            self.reset,
        ]
    }
}

/// Blink sequence timings. Each sequence is ON, sleep, OFF, sleep,
/// repeated `repeats` times — fully blocking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Startup self-test blink on both LEDs.
    pub startup_interval_ms: u64,
    pub startup_repeats: u32,
    /// Goal confirmation blink on the scoring side's LED.
    pub goal_interval_ms: u64,
    pub goal_repeats: u32,
    /// Fast pre-reboot blink on both LEDs.
    pub reset_interval_ms: u64,
    pub reset_repeats: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            startup_interval_ms: 200,
            startup_repeats: 2,
            goal_interval_ms: 150,
            goal_repeats: 3,
            reset_interval_ms: 50,
            reset_repeats: 10,
        }
    }
}

/// Score bridge commands. The side constant (`SIDE_1` / `SIDE_2`) is
/// appended to `broadcast_command` as its final argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Run once at startup; failure is logged and non-fatal.
    pub discover_command: Vec<String>,
    /// Run once per goal, parameterized by the side constant.
    pub broadcast_command: Vec<String>,
    /// When true, a bridge process that exits non-zero counts as a failed
    /// score update. The deployed table leaves this off: the display side
    /// has always been reported successful as long as the spawn worked.
    pub strict_exit_status: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            discover_command: vec!["adb".into(), "devices".into()],
            broadcast_command: vec![
                "adb".into(),
                "shell".into(),
                "am".into(),
                "broadcast".into(),
                "-a".into(),
                "com.instructure.androidfoosball.COUNT_GOAL".into(),
                "--es".into(),
                "side".into(),
            ],
            strict_exit_status: false,
        }
    }
}

/// Core controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub pins: PinConfig,
    pub blink: BlinkConfig,
    pub bridge: BridgeConfig,
    /// Issued unconditionally after the reset blink sequence.
    pub reboot_command: Vec<String>,
    /// One log file per process start is created in this directory.
    pub log_dir: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            pins: PinConfig::default(),
            blink: BlinkConfig::default(),
            bridge: BridgeConfig::default(),
            reboot_command: vec!["sudo".into(), "reboot".into()],
            log_dir: "/var/log/foostable".into(),
        }
    }
}

impl TableConfig {
    /// Load configuration from `FOOSTABLE_CONFIG` if set, defaults otherwise.
    ///
    /// A set-but-unreadable file is an error rather than a silent fallback:
    /// running a physical table on the wrong pin map scores the wrong way.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os("FOOSTABLE_CONFIG") {
            Some(path) => Self::load_from(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate configuration from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound);
        }
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::Io)?;
        let config: Self = serde_json::from_str(&raw).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lines = self.pins.lines();
        for (i, a) in lines.iter().enumerate() {
            if lines[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed("pins: GPIO line assigned twice"));
            }
        }
        let blink = &self.blink;
        if blink.startup_repeats == 0 || blink.goal_repeats == 0 || blink.reset_repeats == 0 {
            return Err(ConfigError::ValidationFailed("blink: repeats must be >= 1"));
        }
        if blink.startup_interval_ms == 0
            || blink.goal_interval_ms == 0
            || blink.reset_interval_ms == 0
        {
            return Err(ConfigError::ValidationFailed("blink: interval must be >= 1ms"));
        }
        if self.bridge.discover_command.is_empty() || self.bridge.broadcast_command.is_empty() {
            return Err(ConfigError::ValidationFailed("bridge: command must not be empty"));
        }
        if self.reboot_command.is_empty() {
            return Err(ConfigError::ValidationFailed("reboot_command must not be empty"));
        }
        if self.log_dir.is_empty() {
            return Err(ConfigError::ValidationFailed("log_dir must not be empty"));
        }
        Ok(())
    }
}

//! Control mode and LED status value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who drives the LED
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Manual,
    Automatic,
}

impl Mode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Mode::Manual => Mode::Automatic,
            Mode::Automatic => Mode::Manual,
        }
    }

    /// Wire name used by the backend's `/set_mode` endpoint
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Manual => "manual",
            Mode::Automatic => "automatic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Manual => write!(f, "Manual"),
            Mode::Automatic => write!(f, "Automatic"),
        }
    }
}

/// On/off state of the LED actuator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedStatus {
    On,
    #[default]
    Off,
}

impl LedStatus {
    pub fn is_on(self) -> bool {
        self == LedStatus::On
    }

    pub fn toggled(self) -> Self {
        match self {
            LedStatus::On => LedStatus::Off,
            LedStatus::Off => LedStatus::On,
        }
    }

    /// Numeric value accepted by `/set_led_status` (1 = on, 0 = off)
    pub fn wire_value(self) -> u8 {
        match self {
            LedStatus::On => 1,
            LedStatus::Off => 0,
        }
    }

    /// Interpret the `led_status` string reported by `/get_led_status`.
    ///
    /// Only an exact `"ON"` means on; every other value reads as off.
    pub fn from_reported(value: &str) -> Self {
        if value == "ON" {
            LedStatus::On
        } else {
            LedStatus::Off
        }
    }
}

impl From<bool> for LedStatus {
    fn from(on: bool) -> Self {
        if on {
            LedStatus::On
        } else {
            LedStatus::Off
        }
    }
}

impl fmt::Display for LedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedStatus::On => write!(f, "ON"),
            LedStatus::Off => write!(f, "OFF"),
        }
    }
}

/// LED status the automatic loop asks for at a given moisture reading.
///
/// The threshold is inclusive: a reading equal to it turns the LED on.
pub fn desired_led_status(moisture: f64, threshold: f64) -> LedStatus {
    LedStatus::from(moisture >= threshold)
}

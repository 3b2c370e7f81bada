//! What the dashboard page renders, derived from state

use serde::Serialize;

use crate::control::Mode;
use crate::state::DashboardState;

/// Moisture readings strictly above this render green
pub const GREEN_ABOVE: f64 = 50.0;

/// Fill color of the moisture progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarColor {
    Green,
    Orange,
}

impl BarColor {
    pub fn for_moisture(moisture: f64) -> Self {
        if moisture > GREEN_ABOVE {
            BarColor::Green
        } else {
            BarColor::Orange
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            BarColor::Green => "green",
            BarColor::Orange => "orange",
        }
    }
}

/// Render model for the single dashboard page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub moisture: f64,
    pub moisture_label: String,
    pub bar_width: String,
    pub bar_color: BarColor,
    pub led_on: bool,
    pub led_label: String,
    pub led_class: &'static str,
    pub mode: Mode,
    pub mode_label: String,
    pub automatic_checked: bool,
    pub button_label: &'static str,
    pub button_class: &'static str,
    pub button_disabled: bool,
    pub button_opacity: f64,
}

impl From<&DashboardState> for DashboardView {
    fn from(state: &DashboardState) -> Self {
        let led_on = state.led.is_on();
        let automatic = state.mode == Mode::Automatic;
        let percent = format!("{}%", state.moisture);

        Self {
            moisture: state.moisture,
            moisture_label: percent.clone(),
            bar_width: percent,
            bar_color: BarColor::for_moisture(state.moisture),
            led_on,
            led_label: format!("LED is {}", state.led),
            led_class: if led_on { "led-on" } else { "led-off" },
            mode: state.mode,
            mode_label: state.mode.to_string(),
            automatic_checked: automatic,
            button_label: if led_on { "Turn LED Off" } else { "Turn LED On" },
            button_class: if led_on {
                "led-button led-on"
            } else {
                "led-button led-off"
            },
            button_disabled: automatic,
            button_opacity: if automatic { 0.5 } else { 1.0 },
        }
    }
}

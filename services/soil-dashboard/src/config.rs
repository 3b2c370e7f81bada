//! Configuration types for the soil dashboard

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Where the sensor/actuator backend lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; unset means requests wait as long as the transport allows
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: None,
        }
    }
}

/// Timer periods for the two periodic tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub moisture_interval: Duration,
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub automatic_control_interval: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            moisture_interval: default_interval(),
            automatic_control_interval: default_interval(),
        }
    }
}

/// Automatic-mode rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Moisture percentage at or above which automatic mode turns the LED on
    #[serde(default = "default_led_on_threshold")]
    pub led_on_threshold: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            led_on_threshold: default_led_on_threshold(),
        }
    }
}

/// Dashboard HTTP surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_listen_address")]
    pub listen_address: IpAddr,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_address: default_listen_address(),
            port: default_dashboard_port(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_interval() -> Duration {
    Duration::from_millis(1000)
}

fn default_led_on_threshold() -> f64 {
    70.0
}

fn default_true() -> bool {
    true
}

fn default_listen_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_dashboard_port() -> u16 {
    3000
}

impl Config {
    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(crate::DashboardError::Config(format!(
                "backend.base_url must start with http:// or https://, got {:?}",
                url
            )));
        }
        if self.polling.moisture_interval.is_zero() {
            return Err(crate::DashboardError::Config(
                "polling.moisture_interval must be greater than zero".to_string(),
            ));
        }
        if self.polling.automatic_control_interval.is_zero() {
            return Err(crate::DashboardError::Config(
                "polling.automatic_control_interval must be greater than zero".to_string(),
            ));
        }
        let threshold = self.control.led_on_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(crate::DashboardError::Config(format!(
                "control.led_on_threshold must be within 0..=100, got {}",
                threshold
            )));
        }
        Ok(())
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

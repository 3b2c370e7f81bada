//! Typed client for the soil sensor backend
//!
//! Wraps the four REST endpoints the dashboard consumes. Every call returns
//! a `Result`; deciding what a failure means for the UI is left to the
//! controller.

use std::sync::Arc;

use serde::Deserialize;

use crate::control::{LedStatus, Mode};
use crate::io::{HttpClient, HttpResponse};

/// Body of `GET /get_moisture`
#[derive(Debug, Deserialize)]
struct MoistureResponse {
    moisture: f64,
}

/// Body of `GET /get_led_status`
#[derive(Debug, Deserialize)]
struct LedStatusResponse {
    led_status: String,
}

/// Client for the moisture/LED backend
#[derive(Clone)]
pub struct SoilBackend {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for SoilBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoilBackend")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SoilBackend {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created SoilBackend at {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current moisture reading in percent
    pub async fn get_moisture(&self) -> crate::Result<f64> {
        let url = self.url("/get_moisture");
        let response = self.http.get(&url).await?;
        ensure_success(&url, &response)?;
        let parsed: MoistureResponse = serde_json::from_str(&response.body)?;
        Ok(parsed.moisture)
    }

    /// LED status as reported by the backend
    pub async fn get_led_status(&self) -> crate::Result<LedStatus> {
        let url = self.url("/get_led_status");
        let response = self.http.get(&url).await?;
        ensure_success(&url, &response)?;
        let parsed: LedStatusResponse = serde_json::from_str(&response.body)?;
        Ok(LedStatus::from_reported(&parsed.led_status))
    }

    /// Ask the backend to switch the LED.
    ///
    /// Returns the raw response: callers differ in whether they care about
    /// the status code.
    pub async fn set_led_status(&self, status: LedStatus) -> crate::Result<HttpResponse> {
        let url = self.url("/set_led_status");
        let body = serde_json::json!({ "led_status": status.wire_value() });
        self.http.post_json(&url, &body).await
    }

    /// Tell the backend which mode the dashboard is in
    pub async fn set_mode(&self, mode: Mode) -> crate::Result<HttpResponse> {
        let url = self.url("/set_mode");
        let body = serde_json::json!({ "mode": mode.as_str() });
        self.http.post_json(&url, &body).await
    }
}

fn ensure_success(url: &str, response: &HttpResponse) -> crate::Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(crate::DashboardError::Status {
            url: url.to_string(),
            status: response.status,
        })
    }
}

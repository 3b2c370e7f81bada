//! Soil Dashboard - soil moisture monitoring with LED control
//!
//! Polls a sensor backend for moisture, lets the user toggle an LED by hand,
//! or drives the LED automatically from the moisture reading.

pub mod backend;
pub mod config;
pub mod control;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod state;
pub mod task;
pub mod view;

pub use config::{load_config, Config};
pub use error::{DashboardError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::backend::SoilBackend;
use crate::controller::DashboardController;
use crate::io::{HttpClient, ReqwestHttpClient};

/// Assembles a [`SoilDashboard`] from configuration
pub struct SoilDashboardBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    cancel: Option<CancellationToken>,
}

impl SoilDashboardBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            cancel: None,
        }
    }

    /// Use a custom HTTP client instead of reqwest
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Stop the service when `cancel` fires, in addition to ctrl-c
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub async fn build(self) -> Result<SoilDashboard> {
        self.config.validate()?;

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => match self.config.backend.request_timeout {
                Some(timeout) => Arc::new(ReqwestHttpClient::with_timeout(timeout)?),
                None => Arc::new(ReqwestHttpClient::new()),
            },
        };
        let cancel = self.cancel.unwrap_or_default();

        let backend = SoilBackend::new(&self.config.backend.base_url, http);
        let controller = Arc::new(DashboardController::new(
            backend,
            state::new_state_handle(),
            &self.config,
            cancel.clone(),
        ));

        tracing::debug!(
            "Built soil dashboard: backend={}, moisture every {:?}, automatic every {:?}, threshold {}%",
            self.config.backend.base_url,
            self.config.polling.moisture_interval,
            self.config.polling.automatic_control_interval,
            self.config.control.led_on_threshold
        );

        Ok(SoilDashboard {
            config: self.config,
            controller,
            cancel,
        })
    }
}

/// A built, not yet running, soil dashboard
pub struct SoilDashboard {
    config: Config,
    controller: Arc<DashboardController>,
    cancel: CancellationToken,
}

impl SoilDashboard {
    pub fn controller(&self) -> &Arc<DashboardController> {
        &self.controller
    }

    /// Token that shuts the service down when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Mount the dashboard and run until cancelled or interrupted
    pub async fn start(self) -> Result<()> {
        self.controller.mount().await;

        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_for_signal.cancelled() => {}
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => {
                        tracing::info!("Shutdown signal received");
                        cancel_for_signal.cancel();
                    }
                    Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
                },
            }
        });

        if self.config.dashboard.enabled {
            self.serve_dashboard().await;
        }

        // Serving ends early when the port cannot be bound; keep polling anyway.
        self.cancel.cancelled().await;

        self.controller.unmount().await;
        tracing::info!("Soil dashboard stopped");
        Ok(())
    }

    async fn serve_dashboard(&self) {
        let addr = SocketAddr::new(
            self.config.dashboard.listen_address,
            self.config.dashboard.port,
        );
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(
                    "Failed to bind dashboard to {}: {}. Continuing without dashboard.",
                    addr,
                    e
                );
                return;
            }
        };
        tracing::info!("Dashboard listening on http://{}", addr);

        let router = dashboard::build_router(Arc::clone(&self.controller));
        let cancel = self.cancel.clone();
        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
        {
            tracing::error!("Dashboard server error: {}", e);
        }
        tracing::debug!("Dashboard stopped");
    }
}

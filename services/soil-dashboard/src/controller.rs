//! Dashboard controller: polls the backend and forwards user intent
//!
//! The controller owns the dashboard's lifetime. [`DashboardController::mount`]
//! starts the moisture poll and, independently, reads the initial LED status;
//! [`DashboardController::unmount`] cancels every timer and request, after
//! which no further requests are issued.
//!
//! Network failures never escape an operation. They are logged and the
//! affected state keeps its previous value.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::backend::SoilBackend;
use crate::config::Config;
use crate::control::{desired_led_status, LedStatus, Mode};
use crate::state::StateHandle;
use crate::task::ScheduledTask;

/// Why a manual LED toggle did not change the LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedToggleRefusal {
    /// The button is disabled while automatic mode drives the LED
    AutomaticMode,
    /// The dashboard is no longer mounted
    Unmounted,
    /// The backend answered with a non-2xx status
    Rejected(u16),
    /// The request never got an answer
    Unreachable,
}

pub struct DashboardController {
    backend: SoilBackend,
    state: StateHandle,
    moisture_interval: Duration,
    automatic_interval: Duration,
    led_on_threshold: f64,
    cancel: CancellationToken,
    moisture_task: Mutex<Option<ScheduledTask>>,
    automatic_task: Mutex<Option<ScheduledTask>>,
    requests: TaskTracker,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("backend", &self.backend)
            .field("moisture_interval", &self.moisture_interval)
            .field("automatic_interval", &self.automatic_interval)
            .field("led_on_threshold", &self.led_on_threshold)
            .finish()
    }
}

impl DashboardController {
    pub fn new(
        backend: SoilBackend,
        state: StateHandle,
        config: &Config,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            backend,
            state,
            moisture_interval: config.polling.moisture_interval,
            automatic_interval: config.polling.automatic_control_interval,
            led_on_threshold: config.control.led_on_threshold,
            cancel,
            moisture_task: Mutex::new(None),
            automatic_task: Mutex::new(None),
            requests: TaskTracker::new(),
        }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    /// True once [`unmount`](Self::unmount) has started; never reset
    pub fn is_unmounted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the automatic-control loop currently has a running timer
    pub fn is_automatic_control_running(&self) -> bool {
        match self.automatic_task.lock() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    /// Start polling moisture and read the initial LED status.
    ///
    /// Neither waits on the other: a backend that never answers
    /// `/get_led_status` does not hold up the moisture poll.
    pub async fn mount(&self) {
        tracing::info!("Mounting dashboard against {}", self.backend.base_url());

        let backend = self.backend.clone();
        let state = self.state.clone();
        let task = ScheduledTask::spawn(
            "moisture-poll",
            self.moisture_interval,
            &self.cancel,
            move || {
                let backend = backend.clone();
                let state = state.clone();
                async move { poll_moisture(&backend, &state).await }
            },
        );
        replace_task(&self.moisture_task, Some(task));

        let backend = self.backend.clone();
        let state = self.state.clone();
        self.spawn_request(async move { fetch_initial_led_status(&backend, &state).await });
    }

    /// Stop every timer, abandon requests still in flight and wait for
    /// their tasks to exit
    pub async fn unmount(&self) {
        tracing::info!("Unmounting dashboard");
        self.cancel.cancel();

        let moisture = take_task(&self.moisture_task);
        let automatic = take_task(&self.automatic_task);
        for task in [moisture, automatic].into_iter().flatten() {
            task.stop().await;
        }

        self.requests.close();
        self.requests.wait().await;
        tracing::debug!("Dashboard unmounted");
    }

    /// One moisture poll; failures keep the previous reading
    pub async fn poll_moisture(&self) {
        poll_moisture(&self.backend, &self.state).await;
    }

    /// Read the LED status once; failures keep the current value
    pub async fn fetch_initial_led_status(&self) {
        fetch_initial_led_status(&self.backend, &self.state).await;
    }

    /// Flip between manual and automatic mode.
    ///
    /// Local state changes immediately and is not rolled back if the backend
    /// notification fails. The notification is sent in the background, so
    /// this returns before the backend has answered.
    pub async fn toggle_mode(&self) -> Mode {
        let mode = {
            let mut state = self.state.write().await;
            state.mode = state.mode.toggled();
            let mode = state.mode;

            // Swapped under the write guard: the loop runs iff the mode is automatic.
            if !self.is_unmounted() {
                let automatic = match mode {
                    Mode::Automatic => Some(self.spawn_automatic_control()),
                    Mode::Manual => None,
                };
                replace_task(&self.automatic_task, automatic);
            }
            mode
        };
        tracing::info!("Mode switched to {}", mode);

        if self.is_unmounted() {
            tracing::warn!("Mode changed after unmount; backend not notified");
            return mode;
        }

        let backend = self.backend.clone();
        self.spawn_request(async move {
            match backend.set_mode(mode).await {
                Ok(response) if !response.is_success() => {
                    tracing::warn!(
                        "Backend answered HTTP {} to mode change {}",
                        response.status,
                        mode.as_str()
                    );
                }
                Ok(_) => tracing::debug!("Backend acknowledged mode {}", mode.as_str()),
                Err(e) => tracing::error!("Error sending mode update: {}", e),
            }
        });

        mode
    }

    /// One automatic-control decision, independent of the current mode
    pub async fn automatic_control_tick(&self) {
        automatic_control_tick(&self.backend, &self.state, self.led_on_threshold).await;
    }

    /// Flip the LED from the manual button.
    ///
    /// State only changes once the backend confirms with a 2xx status.
    pub async fn toggle_led(&self) -> Result<LedStatus, LedToggleRefusal> {
        if self.is_unmounted() {
            return Err(LedToggleRefusal::Unmounted);
        }

        let (mode, current) = {
            let state = self.state.read().await;
            (state.mode, state.led)
        };
        if mode == Mode::Automatic {
            tracing::debug!("Ignoring manual LED toggle in automatic mode");
            return Err(LedToggleRefusal::AutomaticMode);
        }

        let requested = current.toggled();
        match self.backend.set_led_status(requested).await {
            Ok(response) if response.is_success() => {
                self.state.write().await.led = requested;
                tracing::info!("LED turned {}", requested);
                Ok(requested)
            }
            Ok(response) => {
                tracing::error!(
                    "Failed to toggle LED status. HTTP response code: {}",
                    response.status
                );
                Err(LedToggleRefusal::Rejected(response.status))
            }
            Err(e) => {
                tracing::error!("Error toggling LED: {}", e);
                Err(LedToggleRefusal::Unreachable)
            }
        }
    }

    /// Run a one-shot request in the background.
    ///
    /// A request that can complete does; one still waiting on the network
    /// when the dashboard unmounts is dropped.
    fn spawn_request<F>(&self, request: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.requests.spawn(async move {
            tokio::select! {
                biased;
                _ = request => {}
                _ = cancel.cancelled() => tracing::debug!("Request abandoned on unmount"),
            }
        });
    }

    fn spawn_automatic_control(&self) -> ScheduledTask {
        let backend = self.backend.clone();
        let state = self.state.clone();
        let threshold = self.led_on_threshold;
        ScheduledTask::spawn(
            "automatic-control",
            self.automatic_interval,
            &self.cancel,
            move || {
                let backend = backend.clone();
                let state = state.clone();
                async move { automatic_control_tick(&backend, &state, threshold).await }
            },
        )
    }
}

/// Read the reported LED status into state; on failure the current value stays
pub async fn fetch_initial_led_status(backend: &SoilBackend, state: &StateHandle) {
    match backend.get_led_status().await {
        Ok(led) => {
            tracing::debug!("Initial LED status: {}", led);
            state.write().await.led = led;
        }
        Err(e) => {
            tracing::error!("Error fetching LED status: {}", e);
        }
    }
}

/// Fetch moisture and store it; on any failure the old reading stays
pub async fn poll_moisture(backend: &SoilBackend, state: &StateHandle) {
    match backend.get_moisture().await {
        Ok(moisture) => {
            tracing::debug!("Moisture: {}%", moisture);
            state.write().await.moisture = moisture;
        }
        Err(e) => {
            tracing::error!("Error fetching moisture data: {}", e);
        }
    }
}

/// Read moisture, push the matching LED status, and mirror it locally.
///
/// The local LED follows the value sent whenever the POST got any answer,
/// whatever its status code. The moisture card is left alone.
pub async fn automatic_control_tick(backend: &SoilBackend, state: &StateHandle, threshold: f64) {
    let moisture = match backend.get_moisture().await {
        Ok(moisture) => moisture,
        Err(e) => {
            tracing::error!("Error in automatic LED control: {}", e);
            return;
        }
    };

    let desired = desired_led_status(moisture, threshold);
    match backend.set_led_status(desired).await {
        Ok(response) => {
            if !response.is_success() {
                tracing::warn!(
                    "Backend answered HTTP {} to automatic LED {}",
                    response.status,
                    desired
                );
            }
            tracing::debug!("Automatic control: moisture {}% -> LED {}", moisture, desired);
            state.write().await.led = desired;
        }
        Err(e) => {
            tracing::error!("Error in automatic LED control: {}", e);
        }
    }
}

fn replace_task(slot: &Mutex<Option<ScheduledTask>>, task: Option<ScheduledTask>) {
    let previous = match slot.lock() {
        Ok(mut guard) => std::mem::replace(&mut *guard, task),
        Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), task),
    };
    if let Some(previous) = previous {
        tracing::debug!("Cancelling scheduled task '{}'", previous.name());
    }
}

fn take_task(slot: &Mutex<Option<ScheduledTask>>) -> Option<ScheduledTask> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

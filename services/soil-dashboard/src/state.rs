//! Shared dashboard state

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::control::{LedStatus, Mode};

/// Everything the page shows, as last reconciled from the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Latest polled moisture percentage, as reported (not clamped)
    pub moisture: f64,
    pub led: LedStatus,
    pub mode: Mode,
}

impl DashboardState {
    /// Values the page starts with before any backend response arrives
    pub fn new() -> Self {
        Self::default()
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(DashboardState::new()))
}

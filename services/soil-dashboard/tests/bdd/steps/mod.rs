//! BDD step definitions for the soil dashboard

pub mod dashboard_steps;
pub mod lifecycle_steps;
pub mod manual_control_steps;
pub mod mode_steps;

//! BDD step definitions for switching between manual and automatic mode

use std::time::Duration;

use cucumber::{given, then, when};

use crate::world::DashboardWorld;

#[given("the dashboard is in automatic mode")]
async fn in_automatic_mode(world: &mut DashboardWorld) {
    let mode = world.controller().toggle_mode().await;
    assert_eq!(mode.to_string(), "Automatic");
}

#[when("the user flips the mode switch")]
async fn flip_mode(world: &mut DashboardWorld) {
    let mode = world.controller().toggle_mode().await;
    world.mode_after_toggle = Some(mode);
}

#[then(expr = "the mode should be {string}")]
async fn mode_should_be(world: &mut DashboardWorld, expected: String) {
    let mode = world.controller().state().read().await.mode;
    assert_eq!(mode.to_string(), expected);
}

#[then("the automatic control loop should be running")]
fn loop_running(world: &mut DashboardWorld) {
    assert!(world.controller().is_automatic_control_running());
}

#[then("the automatic control loop should be stopped")]
fn loop_stopped(world: &mut DashboardWorld) {
    assert!(!world.controller().is_automatic_control_running());
}

#[then(expr = "the backend should eventually receive mode {string}")]
async fn eventually_receives_mode(world: &mut DashboardWorld, mode: String) {
    let expected = serde_json::json!({ "mode": mode });
    for _ in 0..50 {
        if world.backend.posted("/set_mode").contains(&expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "Backend never received {}; mode posts: {:?}",
        expected,
        world.backend.posted("/set_mode")
    );
}

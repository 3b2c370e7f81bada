//! BDD step definitions for the manual LED button

use std::time::Duration;

use cucumber::{given, then, when};

use soil_dashboard::control::LedStatus;
use soil_dashboard::controller::LedToggleRefusal;

use crate::world::DashboardWorld;

#[given(expr = "the backend reports LED status {string}")]
fn backend_reports_led(world: &mut DashboardWorld, status: String) {
    world.backend.report_led_status(&status);
}

#[given("the backend never answers LED status requests")]
fn backend_hangs_led_status(world: &mut DashboardWorld) {
    world.backend.hang_led_status();
}

#[given(expr = "the backend answers LED changes with HTTP {int}")]
fn backend_answers_posts(world: &mut DashboardWorld, status: u16) {
    world.backend.answer_posts_with_status(status);
}

#[given(expr = "the LED is shown as {string}")]
async fn led_shown_as(world: &mut DashboardWorld, status: String) {
    let led = match status.as_str() {
        "ON" => LedStatus::On,
        "OFF" => LedStatus::Off,
        other => panic!("Unknown LED status: {}", other),
    };
    world.controller().state().write().await.led = led;
}

#[when("the user presses the LED button")]
async fn press_led_button(world: &mut DashboardWorld) {
    let result = world.controller().toggle_led().await;
    world.toggle_result = Some(result);
}

#[then(expr = "the LED should be shown as {string}")]
async fn led_should_be(world: &mut DashboardWorld, expected: String) {
    let led = world.controller().state().read().await.led;
    assert_eq!(led.to_string(), expected);
}

#[then(expr = "the LED should eventually be shown as {string}")]
async fn led_eventually(world: &mut DashboardWorld, expected: String) {
    let controller = world.controller();
    for _ in 0..50 {
        if controller.state().read().await.led.to_string() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "LED never showed {}; last seen {}",
        expected,
        controller.state().read().await.led
    );
}

#[then(expr = "the backend should have received LED status {int}")]
fn received_led_status(world: &mut DashboardWorld, value: u8) {
    let posted = world.backend.posted("/set_led_status");
    let expected = serde_json::json!({ "led_status": value });
    assert!(
        posted.contains(&expected),
        "Expected {} among LED posts {:?}",
        expected,
        posted
    );
}

#[then("no LED change should have been sent")]
fn no_led_change(world: &mut DashboardWorld) {
    let posted = world.backend.posted("/set_led_status");
    assert!(posted.is_empty(), "Unexpected LED posts: {:?}", posted);
}

#[then(expr = "the LED button press should be refused as {string}")]
fn press_refused(world: &mut DashboardWorld, reason: String) {
    let result = world.toggle_result.expect("LED button was not pressed");
    let refusal = result.expect_err("LED toggle unexpectedly succeeded");
    match reason.as_str() {
        "automatic mode" => assert_eq!(refusal, LedToggleRefusal::AutomaticMode),
        "unmounted" => assert_eq!(refusal, LedToggleRefusal::Unmounted),
        "unreachable" => assert_eq!(refusal, LedToggleRefusal::Unreachable),
        other => {
            let status: u16 = other
                .strip_prefix("rejected ")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| panic!("Unknown refusal: {}", other));
            assert_eq!(refusal, LedToggleRefusal::Rejected(status));
        }
    }
}

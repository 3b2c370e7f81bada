//! BDD step definitions for the dashboard HTTP surface

use axum::body::Body;
use axum::http::Request;
use cucumber::{then, when};
use tower::ServiceExt;

use soil_dashboard::dashboard::build_router;

use crate::world::DashboardWorld;

async fn send(world: &mut DashboardWorld, method: &str, uri: &str) {
    let app = build_router(world.controller());
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    world.response_status = Some(response.status().as_u16());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.response_body = Some(String::from_utf8(body.to_vec()).unwrap());
}

#[when("the dashboard page is requested")]
async fn request_page(world: &mut DashboardWorld) {
    send(world, "GET", "/").await;
}

#[when("the dashboard state is requested")]
async fn request_state(world: &mut DashboardWorld) {
    send(world, "GET", "/api/state").await;
}

#[when("the LED button is pressed on the dashboard")]
async fn press_led_on_dashboard(world: &mut DashboardWorld) {
    send(world, "POST", "/api/led/toggle").await;
}

#[when("the mode switch is flipped on the dashboard")]
async fn flip_mode_on_dashboard(world: &mut DashboardWorld) {
    send(world, "POST", "/api/mode/toggle").await;
}

#[when("the health endpoint is requested")]
async fn request_health(world: &mut DashboardWorld) {
    send(world, "GET", "/health").await;
}

#[then(expr = "the response status should be {int}")]
fn response_status(world: &mut DashboardWorld, expected: u16) {
    assert_eq!(world.response_status, Some(expected));
}

#[then(expr = "the response should contain {string}")]
fn response_contains(world: &mut DashboardWorld, expected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert!(
        body.contains(&expected),
        "Expected response to contain '{}', but it didn't.\nResponse body:\n{}",
        expected,
        body
    );
}

#[then(expr = "the response should not contain {string}")]
fn response_not_contains(world: &mut DashboardWorld, unexpected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert!(
        !body.contains(&unexpected),
        "Expected response not to contain '{}'.\nResponse body:\n{}",
        unexpected,
        body
    );
}

#[then(expr = "the JSON field {string} should be {string}")]
fn json_field(world: &mut DashboardWorld, field: String, expected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    let actual = match &json[&field] {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    assert_eq!(actual, expected, "field {} in {}", field, body);
}

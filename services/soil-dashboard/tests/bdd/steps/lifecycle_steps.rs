//! BDD step definitions for mount, unmount and service assembly

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use soil_dashboard::io::HttpClient;
use soil_dashboard::{DashboardError, SoilDashboardBuilder};

use crate::world::DashboardWorld;

#[given(expr = "the backend URL is configured as {string}")]
fn backend_url(world: &mut DashboardWorld, url: String) {
    world.config.backend.base_url = url;
}

#[given("the dashboard server is disabled")]
fn server_disabled(world: &mut DashboardWorld) {
    world.config.dashboard.enabled = false;
}

#[when("the dashboard is unmounted")]
async fn unmount(world: &mut DashboardWorld) {
    world.controller().unmount().await;
    world.requests_at_unmount = Some(world.backend.request_count());
}

#[when("the service is built")]
async fn build_service(world: &mut DashboardWorld) {
    let http: Arc<dyn HttpClient> = world.backend.clone();
    match SoilDashboardBuilder::new(world.config.clone())
        .with_http_client(http)
        .build()
        .await
    {
        Ok(_) => world.build_error = None,
        Err(e) => world.build_error = Some(e),
    }
}

#[when(expr = "the service runs for {int} milliseconds")]
async fn run_service(world: &mut DashboardWorld, millis: u64) {
    let http: Arc<dyn HttpClient> = world.backend.clone();
    let cancel = CancellationToken::new();
    let service = SoilDashboardBuilder::new(world.config.clone())
        .with_http_client(http)
        .with_cancellation_token(cancel.clone())
        .build()
        .await
        .unwrap();
    world.controller = Some(Arc::clone(service.controller()));

    let run = tokio::spawn(service.start());
    tokio::time::sleep(Duration::from_millis(millis)).await;
    cancel.cancel();
    run.await.unwrap().unwrap();
    world.requests_at_unmount = Some(world.backend.request_count());
}

#[then("no requests should be sent after unmount")]
fn no_requests_after_unmount(world: &mut DashboardWorld) {
    let at_unmount = world.requests_at_unmount.expect("dashboard not unmounted");
    assert_eq!(
        world.backend.request_count(),
        at_unmount,
        "requests after unmount: {:?}",
        &world.backend.requests()[at_unmount..]
    );
}

#[then("the dashboard should be unmounted")]
fn is_unmounted(world: &mut DashboardWorld) {
    assert!(world.controller().is_unmounted());
}

#[then("building should fail with a configuration error")]
fn build_failed(world: &mut DashboardWorld) {
    assert!(
        matches!(world.build_error, Some(DashboardError::Config(_))),
        "unexpected build outcome: {:?}",
        world.build_error
    );
}

#[then("building should succeed")]
fn build_succeeded(world: &mut DashboardWorld) {
    assert!(world.build_error.is_none(), "{:?}", world.build_error);
}

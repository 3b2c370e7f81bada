//! Web dashboard: HTML page, JSON state and the two user actions

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::controller::{DashboardController, LedToggleRefusal};
use crate::view::DashboardView;

/// Router state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DashboardController>,
}

/// Build the dashboard axum router
pub fn build_router(controller: Arc<DashboardController>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/state", get(state_handler))
        .route("/api/mode/toggle", post(toggle_mode_handler))
        .route("/api/led/toggle", post(toggle_led_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { controller })
}

async fn current_view(controller: &DashboardController) -> DashboardView {
    let state = controller.state().read().await;
    DashboardView::from(&*state)
}

async fn index_handler(State(app): State<AppState>) -> impl IntoResponse {
    let view = current_view(&app.controller).await;
    Html(render_page(&view))
}

async fn state_handler(State(app): State<AppState>) -> impl IntoResponse {
    Json(current_view(&app.controller).await)
}

async fn toggle_mode_handler(State(app): State<AppState>) -> impl IntoResponse {
    let mode = app.controller.toggle_mode().await;
    tracing::debug!("Mode toggled from dashboard to {}", mode);
    Json(current_view(&app.controller).await)
}

async fn toggle_led_handler(State(app): State<AppState>) -> impl IntoResponse {
    let status = match app.controller.toggle_led().await {
        Ok(_) => StatusCode::OK,
        Err(LedToggleRefusal::AutomaticMode) | Err(LedToggleRefusal::Unmounted) => {
            StatusCode::CONFLICT
        }
        // The backend failure was logged; the page just keeps showing the old state.
        Err(LedToggleRefusal::Rejected(_)) | Err(LedToggleRefusal::Unreachable) => StatusCode::OK,
    };
    (status, Json(current_view(&app.controller).await))
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

/// Server-side render of the dashboard page.
///
/// The embedded script re-renders from `/api/state` every second, so the
/// markup here only needs to be right for the first paint.
pub fn render_page(view: &DashboardView) -> String {
    let checked = if view.automatic_checked { " checked" } else { "" };
    let disabled = if view.button_disabled { " disabled" } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Soil Monitoring Dashboard</title>
    <style>
        .progress-bar {{ width: 100%; height: 1.5rem; background: #e9ecef; border-radius: 0.25rem; overflow: hidden; }}
        .progress {{ height: 100%; }}
        .led-light {{ display: inline-block; width: 1.5rem; height: 1.5rem; border-radius: 50%; }}
        .led-light.led-on {{ background: #ffd60a; box-shadow: 0 0 0.75rem #ffd60a; }}
        .led-light.led-off {{ background: #6c757d; }}
    </style>
    <script>
        function render(view) {{
            const bar = document.getElementById('moisture-bar');
            bar.style.width = view.bar_width;
            bar.style.backgroundColor = view.bar_color;
            document.getElementById('moisture-label').textContent = view.moisture_label;
            document.getElementById('led-light').className = 'led-light ' + view.led_class;
            document.getElementById('led-label').textContent = view.led_label;
            document.getElementById('mode-label').textContent = view.mode_label;
            document.getElementById('mode-toggle').checked = view.automatic_checked;
            const button = document.getElementById('led-button');
            button.textContent = view.button_label;
            button.className = view.button_class;
            button.disabled = view.button_disabled;
            button.style.opacity = view.button_opacity;
        }}
        function refreshData() {{
            fetch('/api/state')
                .then(r => r.json())
                .then(render)
                .catch(e => console.error('Error refreshing dashboard:', e));
        }}
        function post(path) {{
            fetch(path, {{ method: 'POST' }})
                .then(r => r.json())
                .then(render)
                .catch(e => console.error('Error sending ' + path + ':', e));
        }}
        setInterval(refreshData, 1000);
    </script>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 640px; margin: 0 auto; padding: 1rem;">
    <div class="dashboard">
        <h1>Soil Monitoring Dashboard</h1>
        <div class="sensor-data">
            <div class="sensor-card">
                <h2>Moisture Level</h2>
                <div class="progress-bar">
                    <div id="moisture-bar" class="progress" style="width: {bar_width}; background-color: {bar_color};"></div>
                </div>
                <p id="moisture-label">{moisture_label}</p>
            </div>
        </div>
        <div class="led-control">
            <div class="led-indicator">
                <span id="led-light" class="led-light {led_class}"></span>
                <p id="led-label">{led_label}</p>
            </div>
            <div class="slider-container">
                <label class="slider-label">
                    <span id="mode-label">{mode_label}</span>
                    <input id="mode-toggle" type="checkbox" class="slider-input" onchange="post('/api/mode/toggle')"{checked}>
                    <span class="slider"></span>
                </label>
            </div>
            <button id="led-button" class="{button_class}" style="opacity: {button_opacity};" onclick="post('/api/led/toggle')"{disabled}>{button_label}</button>
        </div>
    </div>
</body>
</html>"#,
        bar_width = view.bar_width,
        bar_color = view.bar_color.as_css(),
        moisture_label = view.moisture_label,
        led_class = view.led_class,
        led_label = view.led_label,
        mode_label = view.mode_label,
        checked = checked,
        button_class = view.button_class,
        button_opacity = view.button_opacity,
        disabled = disabled,
        button_label = view.button_label,
    )
}

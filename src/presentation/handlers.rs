// HTTP request handlers
use crate::application::dashboard_surface::LAST_UPDATED_ELEMENT;
use crate::application::refresher::CycleOutcome;
use crate::domain::dashboard::{DashboardView, MetricView};
use crate::infrastructure::http_response::{accepts_brotli, encoded_response, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::page::render_index;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(
        state.refresher.metrics(),
        &state.surface,
        state.refresh_interval,
    ))
}

/// Current labels and chart points as JSON
pub async fn dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = build_view(&state);
    json_response(&view, accepts_brotli(&headers))
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// SVG of one chart, 404 until it has been rendered once
pub async fn chart_svg(
    Path(element_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let element_id = element_id.trim_end_matches(".svg");

    match state.surface.render_chart_svg(element_id) {
        Some(svg) => encoded_response("image/svg+xml", svg.into_bytes(), accepts_brotli(&headers))
            .await
            .unwrap_or_else(IntoResponse::into_response),
        None => (StatusCode::NOT_FOUND, "chart not rendered yet").into_response(),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum RefreshResponse {
    Completed { updated: Vec<String> },
    Skipped,
}

/// Run a refresh cycle now. The cycle runs on its own task so a client
/// hanging up does not cut it short.
pub async fn trigger_refresh(State(state): State<Arc<AppState>>) -> Response {
    let refresher = state.refresher.clone();
    let cycle = tokio::spawn(async move { refresher.refresh_cycle().await });

    let body = match cycle.await {
        Ok(CycleOutcome::Completed { updated }) => RefreshResponse::Completed { updated },
        Ok(CycleOutcome::Skipped) => RefreshResponse::Skipped,
        Err(e) => {
            tracing::error!(error = %e, "Manual refresh task failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    json_response(&body, false)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

fn build_view(state: &AppState) -> DashboardView {
    let metrics = state
        .refresher
        .metrics()
        .iter()
        .map(|m| MetricView {
            id: m.id.clone(),
            sheet: m.source_name.clone(),
            unit: m.unit.clone(),
            value_element_id: m.value_element_id.clone(),
            value: state.surface.text(&m.value_element_id),
            chart_element_id: m.chart_element_id.clone(),
            chart_id: state.refresher.live_chart(&m.chart_element_id).map(|h| h.id),
            points: state
                .surface
                .chart(&m.chart_element_id)
                .map(|c| c.points)
                .unwrap_or_default(),
        })
        .collect();

    DashboardView::new(state.surface.text(LAST_UPDATED_ELEMENT), metrics)
}

// Presentation layer - HTTP surface over the dashboard
pub mod app_state;
pub mod handlers;
pub mod page;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{chart_svg, dashboard, health_check, index, trigger_refresh};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/api/dashboard", get(dashboard))
        .route("/charts/:element_id", get(chart_svg))
        .route("/refresh", post(trigger_refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::refresher::{DashboardRefresher, DEFAULT_LIMIT};
    use crate::application::series_source::{FetchError, SeriesSource};
    use crate::domain::metric::default_metrics;
    use crate::domain::sample::SamplePoint;
    use crate::infrastructure::memory_surface::MemorySurface;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    /// Only the temperature sheet has data
    struct TemperatureOnly;

    #[async_trait]
    impl SeriesSource for TemperatureOnly {
        async fn fetch_series(&self, sheet: &str, _limit: usize) -> Result<Vec<SamplePoint>, FetchError> {
            match sheet {
                "TEMPERATURA" => Ok(vec![
                    SamplePoint::new(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(), 21.3),
                    SamplePoint::new(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(), 21.8),
                ]),
                _ => Err(FetchError::Status {
                    sheet: sheet.to_string(),
                    status: 503,
                }),
            }
        }
    }

    /// Every sheet answers after `delay`, with one reading
    struct SlowSource {
        delay: Duration,
    }

    #[async_trait]
    impl SeriesSource for SlowSource {
        async fn fetch_series(&self, _sheet: &str, _limit: usize) -> Result<Vec<SamplePoint>, FetchError> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![SamplePoint::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
                1.0,
            )])
        }
    }

    async fn spawn_app() -> String {
        spawn_app_with(Arc::new(TemperatureOnly)).await.0
    }

    async fn spawn_app_with(source: Arc<dyn SeriesSource>) -> (String, Arc<MemorySurface>) {
        let surface = Arc::new(MemorySurface::new());
        let refresher = Arc::new(DashboardRefresher::new(
            source,
            surface.clone(),
            default_metrics(),
            DEFAULT_LIMIT,
        ));
        let state = Arc::new(AppState {
            refresher,
            surface: surface.clone(),
            refresh_interval: Duration::from_secs(60),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        (format!("http://{}", addr), surface)
    }

    #[tokio::test]
    async fn test_manual_refresh_survives_client_timeout() {
        let (base, surface) = spawn_app_with(Arc::new(SlowSource {
            delay: Duration::from_millis(100),
        }))
        .await;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let result = client.post(format!("{}/refresh", base)).send().await;
        assert!(result.is_err());

        // The cycle keeps going after the client has gone
        let mut last_updated = None;
        for _ in 0..60 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            last_updated = surface.text("last-updated");
            if last_updated.as_deref().is_some_and(|t| t.starts_with("Last updated: ")) {
                break;
            }
        }
        assert!(
            last_updated.as_deref().is_some_and(|t| t.starts_with("Last updated: ")),
            "cycle was cut short: {:?}",
            last_updated
        );
        assert_eq!(surface.text("lum-int-value").as_deref(), Some("1.0 "));
    }

    #[tokio::test]
    async fn test_health_check() {
        let base = spawn_app().await;
        let body = reqwest::get(format!("{}/healthz", base)).await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_chart_missing_before_refresh() {
        let base = spawn_app().await;
        let response = reqwest::get(format!("{}/charts/temp-chart", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_refresh_then_read_dashboard() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let refresh: serde_json::Value = client
            .post(format!("{}/refresh", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(refresh["status"], "completed");
        assert_eq!(refresh["updated"], serde_json::json!(["temp"]));

        let view: serde_json::Value = client
            .get(format!("{}/api/dashboard", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(view["last_updated"].as_str().unwrap().starts_with("Last updated: "));
        assert_eq!(view["metrics"][0]["value"], "21.8 °C");
        assert_eq!(view["metrics"][0]["points"][1]["y"], 21.8);
        assert!(view["metrics"][0]["chart_id"].is_u64());
        assert_eq!(view["metrics"][1]["value"], serde_json::Value::Null);
        assert_eq!(view["metrics"][1]["chart_id"], serde_json::Value::Null);

        let svg = client
            .get(format!("{}/charts/temp-chart.svg", base))
            .send()
            .await
            .unwrap();
        assert_eq!(svg.headers()["content-type"], "image/svg+xml");
        assert!(svg.text().await.unwrap().starts_with("<svg"));

        let page = client.get(&base).send().await.unwrap().text().await.unwrap();
        assert!(page.contains(r#"id="temp-value">21.8 °C</div>"#));
    }
}

// Dashboard refresher - Keeps value labels and charts in sync with the sheets
use crate::application::dashboard_surface::{DashboardSurface, LAST_UPDATED_ELEMENT};
use crate::application::series_source::SeriesSource;
use crate::domain::chart::{ChartHandle, LineChart};
use crate::domain::metric::MetricConfig;
use crate::domain::sample::{sort_chronologically, ChartPoint, SamplePoint};
use chrono::{DateTime, TimeZone};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Samples requested per sheet
pub const DEFAULT_LIMIT: usize = 30;

const REFRESHING_TEXT: &str = "Refreshing...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Ids of the metrics whose display changed, in refresh order
    Completed { updated: Vec<String> },
    /// Another cycle was still running
    Skipped,
}

pub struct DashboardRefresher {
    source: Arc<dyn SeriesSource>,
    surface: Arc<dyn DashboardSurface>,
    metrics: Vec<MetricConfig>,
    limit: usize,
    /// Live chart per chart element
    charts: Mutex<HashMap<String, ChartHandle>>,
    cycle_running: AtomicBool,
}

/// Clears the in-progress flag when the cycle ends, even by panic
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl DashboardRefresher {
    pub fn new(
        source: Arc<dyn SeriesSource>,
        surface: Arc<dyn DashboardSurface>,
        metrics: Vec<MetricConfig>,
        limit: usize,
    ) -> Self {
        Self {
            source,
            surface,
            metrics,
            limit,
            charts: Mutex::new(HashMap::new()),
            cycle_running: AtomicBool::new(false),
        }
    }

    pub fn metrics(&self) -> &[MetricConfig] {
        &self.metrics
    }

    /// Handle of the chart currently bound to `element_id`
    pub fn live_chart(&self, element_id: &str) -> Option<ChartHandle> {
        self.charts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(element_id)
            .cloned()
    }

    /// Fetch one sheet. Failures are logged and read as "no data".
    pub async fn fetch_series(&self, sheet: &str, limit: usize) -> Vec<SamplePoint> {
        match self.source.fetch_series(sheet, limit).await {
            Ok(points) => {
                tracing::debug!(sheet, count = points.len(), "Fetched series");
                points
            }
            Err(e) => {
                tracing::error!(sheet = e.sheet(), error = %e, "Failed to fetch series");
                Vec::new()
            }
        }
    }

    /// Update one metric's value label and chart.
    /// Returns false when there was nothing to show.
    pub async fn refresh_metric(&self, config: &MetricConfig) -> bool {
        let mut samples = self.fetch_series(&config.source_name, self.limit).await;
        sort_chronologically(&mut samples);

        let Some(latest) = samples.last() else {
            tracing::debug!(metric = %config.id, "No samples, keeping previous display");
            return false;
        };

        self.surface
            .set_text(&config.value_element_id, &config.format_reading(latest.value));

        let points: Vec<ChartPoint> = samples.iter().map(SamplePoint::to_chart_point).collect();
        self.render_chart(&config.chart_element_id, &config.source_name, points);
        true
    }

    /// Replace the chart bound to `element_id`. The previous instance is
    /// destroyed before the new one is created.
    pub fn render_chart(&self, element_id: &str, label: &str, points: Vec<ChartPoint>) -> ChartHandle {
        let mut charts = self.charts.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = charts.remove(element_id) {
            self.surface.destroy_chart(&previous);
        }

        let handle = self
            .surface
            .create_chart(element_id, LineChart::time_series(label, points));
        charts.insert(element_id.to_string(), handle.clone());
        handle
    }

    /// One pass over every metric, in declaration order
    pub async fn refresh_cycle(&self) -> CycleOutcome {
        if self
            .cycle_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Refresh cycle already in progress, skipping");
            return CycleOutcome::Skipped;
        }
        let _guard = CycleGuard(&self.cycle_running);

        let start = Instant::now();
        tracing::info!("Refreshing dashboard");
        self.surface.set_text(LAST_UPDATED_ELEMENT, REFRESHING_TEXT);

        let mut updated = Vec::new();
        for metric in &self.metrics {
            if self.refresh_metric(metric).await {
                updated.push(metric.id.clone());
            }
        }

        self.surface
            .set_text(LAST_UPDATED_ELEMENT, &format_last_updated(&chrono::Local::now()));

        tracing::info!(
            updated = updated.len(),
            total = self.metrics.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dashboard refreshed"
        );

        CycleOutcome::Completed { updated }
    }
}

pub fn format_last_updated<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("Last updated: {}", now.format("%H:%M:%S"))
}

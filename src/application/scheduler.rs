// Refresh scheduler - Runs refresh cycles on a fixed period
use crate::application::refresher::{CycleOutcome, DashboardRefresher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Default period between refresh cycles
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Run a cycle immediately, then every `period` until `shutdown` turns true.
/// A running cycle is always allowed to finish.
pub async fn run_refresh_loop(
    refresher: Arc<DashboardRefresher>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(period_secs = period.as_secs(), "Starting refresh loop");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let CycleOutcome::Skipped = refresher.refresh_cycle().await {
                    tracing::debug!("Scheduled cycle skipped");
                }
            }
            changed = shutdown.changed() => {
                // A dropped sender also stops the loop
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("Refresh loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_surface::DashboardSurface;
    use crate::application::series_source::{FetchError, SeriesSource};
    use crate::domain::chart::{ChartHandle, LineChart};
    use crate::domain::metric::MetricConfig;
    use crate::domain::sample::SamplePoint;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SeriesSource for CountingSource {
        async fn fetch_series(&self, _sheet: &str, _limit: usize) -> Result<Vec<SamplePoint>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    struct NullSurface;

    impl DashboardSurface for NullSurface {
        fn set_text(&self, _element_id: &str, _text: &str) {}

        fn create_chart(&self, element_id: &str, _chart: LineChart) -> ChartHandle {
            ChartHandle::new(0, element_id)
        }

        fn destroy_chart(&self, _handle: &ChartHandle) {}
    }

    fn single_metric() -> Vec<MetricConfig> {
        vec![MetricConfig::new("temp", "temp-value", "temp-chart", "TEMPERATURA", "°C")]
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_every_period() {
        let source = Arc::new(CountingSource::default());
        let refresher = Arc::new(DashboardRefresher::new(
            source.clone(),
            Arc::new(NullSurface),
            single_metric(),
            30,
        ));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run_refresh_loop(refresher, Duration::from_secs(60), rx));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_sender_dropped() {
        let refresher = Arc::new(DashboardRefresher::new(
            Arc::new(CountingSource::default()),
            Arc::new(NullSurface),
            single_metric(),
            30,
        ));
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_refresh_loop(refresher, Duration::from_secs(60), rx));

        drop(tx);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("loop should stop")
            .unwrap();
    }
}

// In-memory dashboard surface - text targets and live charts
use crate::application::dashboard_surface::DashboardSurface;
use crate::domain::chart::{ChartHandle, LineChart};
use crate::infrastructure::svg_chart::render_svg;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct LiveChart {
    handle: ChartHandle,
    chart: LineChart,
}

#[derive(Debug, Default)]
struct SurfaceState {
    texts: HashMap<String, String>,
    charts: HashMap<String, LiveChart>,
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
    next_chart_id: AtomicU64,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn text(&self, element_id: &str) -> Option<String> {
        self.state().texts.get(element_id).cloned()
    }

    pub fn chart(&self, element_id: &str) -> Option<LineChart> {
        self.state().charts.get(element_id).map(|live| live.chart.clone())
    }

    /// SVG for the chart bound to `element_id`, in the server's local time
    pub fn render_chart_svg(&self, element_id: &str) -> Option<String> {
        let chart = self.chart(element_id)?;
        Some(render_svg(&chart, &chrono::Local))
    }
}

impl DashboardSurface for MemorySurface {
    fn set_text(&self, element_id: &str, text: &str) {
        self.state()
            .texts
            .insert(element_id.to_string(), text.to_string());
    }

    fn create_chart(&self, element_id: &str, chart: LineChart) -> ChartHandle {
        let handle = ChartHandle::new(
            self.next_chart_id.fetch_add(1, Ordering::Relaxed) + 1,
            element_id,
        );

        let previous = self.state().charts.insert(
            element_id.to_string(),
            LiveChart {
                handle: handle.clone(),
                chart,
            },
        );
        if let Some(previous) = previous {
            tracing::warn!(
                element_id,
                chart_id = previous.handle.id,
                "Chart replaced without being destroyed"
            );
        }

        handle
    }

    fn destroy_chart(&self, handle: &ChartHandle) {
        let mut state = self.state();
        let is_live = state
            .charts
            .get(&handle.element_id)
            .is_some_and(|live| live.handle == *handle);

        if is_live {
            state.charts.remove(&handle.element_id);
        } else {
            tracing::warn!(
                element_id = %handle.element_id,
                chart_id = handle.id,
                "Ignoring destroy of a chart that is not live"
            );
        }
    }
}

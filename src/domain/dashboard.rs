// Dashboard domain model - read view over the surface
use super::sample::ChartPoint;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MetricView {
    pub id: String,
    pub sheet: String,
    pub unit: String,
    pub value_element_id: String,
    pub value: Option<String>,
    pub chart_element_id: String,
    /// Id of the live chart instance, changes on every redraw
    pub chart_id: Option<u64>,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub last_updated: Option<String>,
    pub metrics: Vec<MetricView>,
}

impl DashboardView {
    pub fn new(last_updated: Option<String>, metrics: Vec<MetricView>) -> Self {
        Self {
            last_updated,
            metrics,
        }
    }
}

// Chart domain models - what the surface is asked to draw
use super::sample::ChartPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hour,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub unit: TimeUnit,
    /// strftime pattern for tick labels
    pub display_format: &'static str,
    pub tooltip_format: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub fill: bool,
    /// Bezier tension, 0.0 draws straight segments
    pub tension: f64,
    pub point_radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub label: String,
    pub points: Vec<ChartPoint>,
    pub x_axis: TimeAxis,
    pub style: LineStyle,
    pub show_legend: bool,
}

impl LineChart {
    /// Single-series time chart with the dashboard's fixed look
    pub fn time_series(label: impl Into<String>, points: Vec<ChartPoint>) -> Self {
        Self {
            label: label.into(),
            points,
            x_axis: TimeAxis {
                unit: TimeUnit::Hour,
                display_format: "%H:%M",
                tooltip_format: "%d/%m/%Y %H:%M",
            },
            style: LineStyle {
                border_color: "#007bff",
                background_color: "rgba(0, 123, 255, 0.1)",
                fill: true,
                tension: 0.3,
                point_radius: 2.0,
            },
            show_legend: false,
        }
    }
}

/// A live chart instance bound to one element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartHandle {
    pub id: u64,
    pub element_id: String,
}

impl ChartHandle {
    pub fn new(id: u64, element_id: impl Into<String>) -> Self {
        Self {
            id,
            element_id: element_id.into(),
        }
    }
}

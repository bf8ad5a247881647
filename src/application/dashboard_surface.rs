// Surface trait - the text targets and chart slots the refresher drives
use crate::domain::chart::{ChartHandle, LineChart};

/// Element receiving the refresh status and last update time
pub const LAST_UPDATED_ELEMENT: &str = "last-updated";

pub trait DashboardSurface: Send + Sync {
    fn set_text(&self, element_id: &str, text: &str);

    /// Bind a new chart to `element_id`
    fn create_chart(&self, element_id: &str, chart: LineChart) -> ChartHandle;

    /// Dispose of a chart created by `create_chart`
    fn destroy_chart(&self, handle: &ChartHandle);
}

// Application state for HTTP handlers
use crate::application::refresher::DashboardRefresher;
use crate::infrastructure::memory_surface::MemorySurface;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub refresher: Arc<DashboardRefresher>,
    pub surface: Arc<MemorySurface>,
    pub refresh_interval: Duration,
}

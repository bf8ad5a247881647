// Application layer - Use cases and the traits adapters implement
pub mod dashboard_surface;
pub mod refresher;
pub mod scheduler;
pub mod series_source;

// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod markup;
pub mod memory_surface;
pub mod sheet_client;
pub mod svg_chart;

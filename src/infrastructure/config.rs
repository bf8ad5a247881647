use crate::application::refresher::DEFAULT_LIMIT;
use crate::application::scheduler::DEFAULT_REFRESH_INTERVAL;
use crate::domain::metric::{default_metrics, MetricConfig};
use serde::Deserialize;
use std::time::Duration;

/// Apps Script endpoint serving the sensor sheets
pub const DEFAULT_API_URL: &str = "https://script.google.com/macros/s/AKfycbwrpKejqXSu1Fn4zjAZ5jdzI1Qw7Yg3Bi5DcWlbwdVV4pq9pYLpn4eE4Wq0bAJrooTi/exec";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricConfig>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_refresh_interval_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Defaults, then `config/dashboard.{toml,...}` if present, then
/// `DASHBOARD__*` environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> DashboardConfig {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("");

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.limit, 30);
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.metrics, default_metrics());
    }

    #[test]
    fn test_overrides() {
        let config = from_toml(
            r#"
            api_url = "http://localhost:9000/exec"
            refresh_interval_secs = 15
            request_timeout_secs = 10

            [[metrics]]
            id = "temp"
            value_element_id = "temp-value"
            chart_element_id = "temp-chart"
            source_name = "TEMPERATURA"
            unit = "°C"

            [[metrics]]
            id = "co2"
            value_element_id = "co2-value"
            chart_element_id = "co2-chart"
            source_name = "CO2"
            "#,
        );

        assert_eq!(config.api_url, "http://localhost:9000/exec");
        assert_eq!(config.limit, 30);
        assert_eq!(config.refresh_interval(), Duration::from_secs(15));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.metrics.len(), 2);
        assert_eq!(config.metrics[1].source_name, "CO2");
        assert_eq!(config.metrics[1].unit, "");
    }
}

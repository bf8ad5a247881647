// Index page - the value labels and chart images, rendered server-side
use crate::application::dashboard_surface::LAST_UPDATED_ELEMENT;
use crate::domain::metric::MetricConfig;
use crate::infrastructure::markup::escape;
use crate::infrastructure::memory_surface::MemorySurface;
use std::time::Duration;

const PAGE_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="refresh" content="{refresh}">
    <title>Sensor Dashboard</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: #f8fafc; color: #1e293b; }
        .container { max-width: 1200px; margin: 0 auto; padding: 1.5rem; }
        header { display: flex; justify-content: space-between; align-items: baseline; margin-bottom: 1.5rem; }
        h1 { font-size: 1.25rem; font-weight: 600; }
        #last-updated { font-size: 0.875rem; color: #64748b; }
        .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 1rem; }
        .card { background: #fff; border: 1px solid #e2e8f0; border-radius: 0.5rem; padding: 1rem; }
        .card h2 { font-size: 0.875rem; color: #64748b; font-weight: 500; }
        .value { font-size: 2rem; font-weight: 600; margin: 0.25rem 0 0.75rem; }
        .card img { width: 100%; height: auto; }
    </style>
</head>
<body>
<div class="container">
"##;

const PAGE_TAIL: &str = "</div>\n</body>\n</html>\n";

pub fn render_index(metrics: &[MetricConfig], surface: &MemorySurface, refresh_interval: Duration) -> String {
    let mut html = PAGE_HEAD.replace("{refresh}", &refresh_interval.as_secs().to_string());

    html.push_str(&format!(
        "<header><h1>Sensor Dashboard</h1><span id=\"{}\">{}</span></header>\n<div class=\"grid\">\n",
        LAST_UPDATED_ELEMENT,
        escape(&surface.text(LAST_UPDATED_ELEMENT).unwrap_or_default()),
    ));

    for metric in metrics {
        let value = surface
            .text(&metric.value_element_id)
            .unwrap_or_else(|| "--".to_string());
        let chart = if surface.chart(&metric.chart_element_id).is_some() {
            format!(
                "<img id=\"{id}\" src=\"/charts/{id}\" alt=\"{alt}\">",
                id = escape(&metric.chart_element_id),
                alt = escape(&metric.source_name),
            )
        } else {
            format!("<div id=\"{}\"></div>", escape(&metric.chart_element_id))
        };

        html.push_str(&format!(
            "<section class=\"card\"><h2>{}</h2><div class=\"value\" id=\"{}\">{}</div>{}</section>\n",
            escape(&metric.source_name),
            escape(&metric.value_element_id),
            escape(&value),
            chart,
        ));
    }

    html.push_str("</div>\n");
    html.push_str(PAGE_TAIL);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_surface::DashboardSurface;
    use crate::domain::chart::LineChart;
    use crate::domain::metric::default_metrics;

    #[test]
    fn test_render_index() {
        let surface = MemorySurface::new();
        surface.set_text("temp-value", "21.8 °C");
        surface.set_text("last-updated", "Last updated: 10:00:00");
        surface.create_chart("temp-chart", LineChart::time_series("TEMPERATURA", Vec::new()));

        let html = render_index(&default_metrics(), &surface, Duration::from_secs(60));

        assert!(html.contains(r#"content="60""#));
        assert!(html.contains(r#"<span id="last-updated">Last updated: 10:00:00</span>"#));
        assert!(html.contains(r#"id="temp-value">21.8 °C</div>"#));
        assert!(html.contains(r#"<img id="temp-chart" src="/charts/temp-chart""#));
        // No chart yet for the other metrics
        assert!(html.contains(r#"id="hum-air-value">--</div>"#));
        assert!(html.contains(r#"<div id="hum-air-chart"></div>"#));
    }
}

// SVG rendering for single-series time charts
use crate::domain::chart::{LineChart, TimeUnit};
use crate::infrastructure::markup::escape;
use chrono::{DateTime, Duration, TimeZone, Timelike};
use std::fmt::Display;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 240.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 12.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 28.0;
const MAX_X_TICKS: i64 = 12;
const Y_TICKS: usize = 5;
const GRID_COLOR: &str = "rgba(0, 0, 0, 0.1)";
const TICK_COLOR: &str = "#666";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Px {
    x: f64,
    y: f64,
}

/// Maps data space into the plot area
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn plot_left() -> f64 {
        MARGIN_LEFT
    }

    fn plot_right() -> f64 {
        WIDTH - MARGIN_RIGHT
    }

    fn plot_top() -> f64 {
        MARGIN_TOP
    }

    fn plot_bottom() -> f64 {
        HEIGHT - MARGIN_BOTTOM
    }

    fn fit(chart: &LineChart) -> Option<Self> {
        let first = chart.points.first()?;
        let (mut x_min, mut x_max) = (first.x as f64, first.x as f64);
        let (mut y_min, mut y_max) = (first.y, first.y);
        for p in &chart.points {
            x_min = x_min.min(p.x as f64);
            x_max = x_max.max(p.x as f64);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }

        if x_max - x_min < 1.0 {
            let half_hour = 30.0 * 60.0 * 1000.0;
            x_min -= half_hour;
            x_max += half_hour;
        }

        let span = y_max - y_min;
        let pad = if span.abs() < f64::EPSILON {
            (y_max.abs() * 0.1).max(1.0)
        } else {
            span * 0.05
        };

        Some(Self {
            x_min,
            x_max,
            y_min: y_min - pad,
            y_max: y_max + pad,
        })
    }

    fn project(&self, x: i64, y: f64) -> Px {
        let width = Self::plot_right() - Self::plot_left();
        let height = Self::plot_bottom() - Self::plot_top();
        Px {
            x: Self::plot_left() + (x as f64 - self.x_min) / (self.x_max - self.x_min) * width,
            y: Self::plot_bottom() - (y - self.y_min) / (self.y_max - self.y_min) * height,
        }
    }
}

/// Render `chart` as a standalone SVG document. Time labels use `tz`.
pub fn render_svg<Tz: TimeZone>(chart: &LineChart, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{label}">"#,
        w = WIDTH,
        h = HEIGHT,
        label = escape(&chart.label),
    );

    let Some(frame) = Frame::fit(chart) else {
        out.push_str(&axes_frame());
        out.push_str("</svg>");
        return out;
    };

    out.push_str(&y_grid(&frame));
    out.push_str(&x_grid(chart, &frame, tz));
    out.push_str(&axes_frame());

    let pixels: Vec<Px> = chart.points.iter().map(|p| frame.project(p.x, p.y)).collect();
    let line = line_path(&pixels, chart.style.tension);

    if chart.style.fill {
        let (first, last) = (pixels[0], pixels[pixels.len() - 1]);
        out.push_str(&format!(
            r#"<path d="{} L{:.2},{:.2} L{:.2},{:.2} Z" fill="{}" stroke="none"/>"#,
            line,
            last.x,
            Frame::plot_bottom(),
            first.x,
            Frame::plot_bottom(),
            chart.style.background_color,
        ));
    }

    out.push_str(&format!(
        r#"<path d="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
        line, chart.style.border_color
    ));

    if chart.show_legend {
        out.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="11" fill="{}" text-anchor="end">{}</text>"#,
            Frame::plot_right(),
            Frame::plot_top() + 10.0,
            chart.style.border_color,
            escape(&chart.label),
        ));
    }

    for (px, point) in pixels.iter().zip(&chart.points) {
        let when = tz
            .timestamp_millis_opt(point.x)
            .single()
            .map(|t| t.format(chart.x_axis.tooltip_format).to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"><title>{}: {}</title></circle>"#,
            px.x,
            px.y,
            chart.style.point_radius,
            chart.style.border_color,
            escape(&when),
            point.y,
        ));
    }

    out.push_str("</svg>");
    out
}

fn axes_frame() -> String {
    format!(
        r#"<path d="M{l},{t} L{l},{b} L{r},{b}" fill="none" stroke="{c}"/>"#,
        l = Frame::plot_left(),
        t = Frame::plot_top(),
        b = Frame::plot_bottom(),
        r = Frame::plot_right(),
        c = TICK_COLOR,
    )
}

fn y_grid(frame: &Frame) -> String {
    let mut out = String::new();
    for i in 0..Y_TICKS {
        let value = frame.y_min + (frame.y_max - frame.y_min) * i as f64 / (Y_TICKS - 1) as f64;
        let y = frame.project(frame.x_min as i64, value).y;
        out.push_str(&format!(
            r#"<line x1="{l}" y1="{y:.2}" x2="{r}" y2="{y:.2}" stroke="{g}"/><text x="{tx}" y="{y:.2}" font-size="10" fill="{c}" text-anchor="end" dominant-baseline="middle">{v:.1}</text>"#,
            l = Frame::plot_left(),
            r = Frame::plot_right(),
            y = y,
            g = GRID_COLOR,
            tx = Frame::plot_left() - 4.0,
            c = TICK_COLOR,
            v = value,
        ));
    }
    out
}

fn x_grid<Tz: TimeZone>(chart: &LineChart, frame: &Frame, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut out = String::new();
    for tick in time_ticks(chart.x_axis.unit, frame.x_min as i64, frame.x_max as i64, tz) {
        let x = frame.project(tick.timestamp_millis(), frame.y_min).x;
        out.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{t}" x2="{x:.2}" y2="{b}" stroke="{g}"/><text x="{x:.2}" y="{ty}" font-size="10" fill="{c}" text-anchor="middle">{label}</text>"#,
            x = x,
            t = Frame::plot_top(),
            b = Frame::plot_bottom(),
            g = GRID_COLOR,
            ty = Frame::plot_bottom() + 16.0,
            c = TICK_COLOR,
            label = tick.format(chart.x_axis.display_format),
        ));
    }
    out
}

/// Whole-unit boundaries inside `[start_ms, end_ms]`, thinned to at most
/// `MAX_X_TICKS` labels
fn time_ticks<Tz: TimeZone>(unit: TimeUnit, start_ms: i64, end_ms: i64, tz: &Tz) -> Vec<DateTime<Tz>> {
    let step_unit = match unit {
        TimeUnit::Hour => Duration::hours(1),
    };

    let Some(start) = tz.timestamp_millis_opt(start_ms).single() else {
        return Vec::new();
    };
    let Some(mut tick) = start
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
    else {
        return Vec::new();
    };
    if tick.timestamp_millis() < start_ms {
        let Some(next) = tick.checked_add_signed(step_unit) else {
            return Vec::new();
        };
        tick = next;
    }

    let span_units = end_ms.saturating_sub(tick.timestamp_millis()) / step_unit.num_milliseconds() + 1;
    let stride = (span_units + MAX_X_TICKS - 1) / MAX_X_TICKS;
    let Some(step) = i32::try_from(stride.max(1))
        .ok()
        .and_then(|stride| step_unit.checked_mul(stride))
    else {
        return Vec::new();
    };

    let mut ticks = Vec::new();
    while tick.timestamp_millis() <= end_ms {
        ticks.push(tick.clone());
        // Stop at the end of the representable range
        match tick.checked_add_signed(step) {
            Some(next) => tick = next,
            None => break,
        }
    }
    ticks
}

/// Line through `points`. With a positive tension each segment is a cubic
/// bezier whose handles follow the neighbouring points.
fn line_path(points: &[Px], tension: f64) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut d = format!("M{:.2},{:.2}", first.x, first.y);

    if tension <= 0.0 || points.len() < 3 {
        for p in &points[1..] {
            d.push_str(&format!(" L{:.2},{:.2}", p.x, p.y));
        }
        return d;
    }

    let handles: Vec<(Px, Px)> = (0..points.len())
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(points.len() - 1)];
            spline_handles(prev, points[i], next, tension)
        })
        .collect();

    for i in 1..points.len() {
        let c1 = handles[i - 1].1;
        let c2 = handles[i].0;
        let p = points[i];
        d.push_str(&format!(
            " C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
            c1.x, c1.y, c2.x, c2.y, p.x, p.y
        ));
    }
    d
}

/// Incoming and outgoing control points for `current`, kept inside the plot
fn spline_handles(prev: Px, current: Px, next: Px, tension: f64) -> (Px, Px) {
    let d01 = ((current.x - prev.x).powi(2) + (current.y - prev.y).powi(2)).sqrt();
    let d12 = ((next.x - current.x).powi(2) + (next.y - current.y).powi(2)).sqrt();
    let total = d01 + d12;
    let (s01, s12) = if total > 0.0 {
        (d01 / total, d12 / total)
    } else {
        (0.0, 0.0)
    };

    let fa = tension * s01;
    let fb = tension * s12;
    let dx = next.x - prev.x;
    let dy = next.y - prev.y;

    let clamp = |p: Px| Px {
        x: p.x.clamp(Frame::plot_left(), Frame::plot_right()),
        y: p.y.clamp(Frame::plot_top(), Frame::plot_bottom()),
    };

    (
        clamp(Px {
            x: current.x - fa * dx,
            y: current.y - fa * dy,
        }),
        clamp(Px {
            x: current.x + fb * dx,
            y: current.y + fb * dy,
        }),
    )
}

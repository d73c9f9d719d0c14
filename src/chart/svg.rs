use crate::chart::{Scale, LEGEND_TITLE, X_AXIS_TITLE, Y_AXIS_TITLE};
use crate::data::signals::parse_date_labels;
use chrono::Datelike;

const WIDTH: i32 = 720;
const HEIGHT: i32 = 360;
const PADDING: f64 = 56.0;
const Y_TICKS: usize = 5;
const MAX_X_LABELS: usize = 8;

pub const STRATEGY_COLOR: &str = "#636efa";
pub const BENCHMARK_COLOR: &str = "#ef553b";

//a named line on the chart
#[derive(Debug, Clone, Copy)]
pub struct LineSeries<'a> {
    pub label: &'a str,
    pub color: &'static str,
    pub values: &'a [f64],
}

impl<'a> LineSeries<'a> {
    pub fn new(label: &'a str, color: &'static str, values: &'a [f64]) -> Self {
        LineSeries {
            label,
            color,
            values,
        }
    }
}

//maps a value into plotting space, None when it cannot be drawn on this scale
fn transform(value: f64, scale: Scale) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    match scale {
        Scale::Linear => Some(value),
        Scale::Log if value > 0.0 => Some(value.ln()),
        Scale::Log => None,
    }
}

fn inverse(value: f64, scale: Scale) -> f64 {
    match scale {
        Scale::Linear => value,
        Scale::Log => value.exp(),
    }
}

fn extent(series: &[LineSeries<'_>], scale: Scale) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;

    for value in series
        .iter()
        .flat_map(|s| s.values.iter())
        .filter_map(|&v| transform(v, scale))
    {
        min_v = min_v.min(value);
        max_v = max_v.max(value);
    }

    if !min_v.is_finite() || !max_v.is_finite() {
        return None;
    }

    if min_v == max_v {
        //widen flat ranges so the line sits mid-chart
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
        min_v -= adjust;
        max_v += adjust;
    }

    Some((min_v, max_v))
}

fn scale_y(value: f64, (min_v, max_v): (f64, f64), height: f64) -> f64 {
    let inner_height = height - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn x_positions(len: usize, width: f64) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![width / 2.0],
        _ => {
            let inner_width = width - 2.0 * PADDING;
            (0..len)
                .map(|i| PADDING + inner_width * (i as f64 / (len - 1) as f64))
                .collect()
        }
    }
}

//pixel coordinates of the drawable points of one series
pub(crate) fn project_points(
    values: &[f64],
    xs: &[f64],
    scale: Scale,
    bounds: (f64, f64),
    height: f64,
) -> Vec<(f64, f64)> {
    values
        .iter()
        .zip(xs)
        .filter_map(|(&v, &x)| transform(v, scale).map(|t| (x, scale_y(t, bounds, height))))
        .collect()
}

//indices of the date axis that get a label
fn x_label_indices(dates: &[String]) -> Vec<usize> {
    if dates.is_empty() {
        return Vec::new();
    }

    //calendar dates get a tick on each new month
    let candidates: Vec<usize> = match parse_date_labels(dates) {
        Some(parsed) => {
            let mut last_month = None;
            parsed
                .iter()
                .enumerate()
                .filter_map(|(idx, date)| {
                    let key = (date.year(), date.month());
                    if last_month == Some(key) {
                        None
                    } else {
                        last_month = Some(key);
                        Some(idx)
                    }
                })
                .collect()
        }
        None => (0..dates.len()).collect(),
    };

    let step = candidates.len().div_ceil(MAX_X_LABELS).max(1);
    candidates.into_iter().step_by(step).collect()
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn svg_header(width: i32, height: i32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#444}}</style>"#
    )
}

fn draw_y_axis(svg: &mut String, bounds: (f64, f64), scale: Scale, width: f64, height: f64) {
    let (min_v, max_v) = bounds;
    for i in 0..Y_TICKS {
        let t = min_v + (max_v - min_v) * i as f64 / (Y_TICKS - 1) as f64;
        let y = scale_y(t, bounds, height);
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#e5e5e5" stroke-width="1" />"##,
            x1 = PADDING,
            x2 = width - PADDING,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"#,
            x = PADDING - 6.0,
            y = y + 3.0,
            label = format_tick(inverse(t, scale)),
        ));
    }
}

fn draw_x_axis(svg: &mut String, dates: &[String], xs: &[f64], width: f64, height: f64) {
    let axis_y = height - PADDING;
    svg.push_str(&format!(
        r##"<line x1="{x1:.2}" y1="{axis_y:.2}" x2="{x2:.2}" y2="{axis_y:.2}" stroke="#000" stroke-width="1" />"##,
        x1 = PADDING,
        x2 = width - PADDING,
    ));

    for idx in x_label_indices(dates) {
        let Some(&x) = xs.get(idx) else { break };
        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{axis_y:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#ccc" stroke-width="1" />"##,
            y2 = axis_y + 4.0,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            y = axis_y + 16.0,
            label = escape(&dates[idx]),
        ));
    }
}

fn draw_axis_titles(svg: &mut String, width: f64, height: f64) {
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="12">{X_AXIS_TITLE}</text>"#,
        x = width / 2.0,
        y = height - 12.0,
    ));
    svg.push_str(&format!(
        r#"<text x="14" y="{y:.2}" text-anchor="middle" font-size="12" transform="rotate(-90 14 {y:.2})">{Y_AXIS_TITLE}</text>"#,
        y = height / 2.0,
    ));
}

fn draw_legend(svg: &mut String, series: &[LineSeries<'_>]) {
    let x = PADDING + 10.0;
    let mut y = PADDING + 4.0;
    svg.push_str(&format!(
        r##"<text x="{x:.2}" y="{y:.2}" fill="#333" font-weight="bold">{LEGEND_TITLE}</text>"##
    ));
    for entry in series {
        y += 16.0;
        svg.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{ly:.2}" x2="{x2:.2}" y2="{ly:.2}" stroke="{color}" stroke-width="2" />"#,
            ly = y - 4.0,
            x2 = x + 20.0,
            color = entry.color,
        ));
        svg.push_str(&format!(
            r##"<text x="{tx:.2}" y="{y:.2}" fill="#333">{label}</text>"##,
            tx = x + 26.0,
            label = escape(entry.label),
        ));
    }
}

//renders line series over a shared date axis as a standalone svg element
pub fn render_line_chart(dates: &[String], series: &[LineSeries<'_>], scale: Scale) -> String {
    let width = WIDTH as f64;
    let height = HEIGHT as f64;
    let xs = x_positions(dates.len(), width);

    let mut svg = svg_header(WIDTH, HEIGHT);

    if let Some(bounds) = extent(series, scale) {
        draw_y_axis(&mut svg, bounds, scale, width, height);

        for line in series {
            let points = project_points(line.values, &xs, scale, bounds, height);
            if points.is_empty() {
                continue;
            }
            let points_attr = points
                .iter()
                .map(|(x, y)| format!("{x:.2},{y:.2}"))
                .collect::<Vec<_>>()
                .join(" ");
            svg.push_str(&format!(
                r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{points_attr}" />"#,
                color = line.color,
            ));
        }
    }

    draw_x_axis(&mut svg, dates, &xs, width, height);
    draw_axis_titles(&mut svg, width, height);
    draw_legend(&mut svg, series);

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_scale_skips_non_positive() {
        let xs = x_positions(4, WIDTH as f64);
        let values = [1.0, 0.0, -0.5, 2.0];
        let bounds = (0.0, 2f64.ln());
        let points = project_points(&values, &xs, Scale::Log, bounds, HEIGHT as f64);
        assert_eq!(points.len(), 2);

        let linear = project_points(&values, &xs, Scale::Linear, (-0.5, 2.0), HEIGHT as f64);
        assert_eq!(linear.len(), 4);
    }

    #[test]
    fn test_extent_widens_flat_series() {
        let values = [1.0, 1.0];
        let series = [LineSeries::new("flat", STRATEGY_COLOR, &values)];
        let (lo, hi) = extent(&series, Scale::Linear).unwrap();
        assert!(lo < 1.0 && hi > 1.0);
    }

    #[test]
    fn test_extent_none_without_drawable_values() {
        let values = [0.0, -1.0];
        let series = [LineSeries::new("gone", STRATEGY_COLOR, &values)];
        assert!(extent(&series, Scale::Log).is_none());
        assert!(extent(&[], Scale::Linear).is_none());
    }

    #[test]
    fn test_month_ticks_for_calendar_dates() {
        let dates: Vec<String> = ["2024-01-30", "2024-01-31", "2024-02-01", "2024-03-01"]
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(x_label_indices(&dates), vec![0, 2, 3]);
    }

    #[test]
    fn test_label_count_is_bounded() {
        let dates: Vec<String> = (0..100).map(|i| format!("day {i}")).collect();
        assert!(x_label_indices(&dates).len() <= MAX_X_LABELS);
    }

    #[test]
    fn test_labels_are_escaped() {
        let dates = vec!["<b>".to_string()];
        let values = [1.0];
        let svg = render_line_chart(
            &dates,
            &[LineSeries::new("a & b", STRATEGY_COLOR, &values)],
            Scale::Linear,
        );
        assert!(svg.contains("&lt;b&gt;"));
        assert!(svg.contains("a &amp; b"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_empty_chart_still_renders() {
        let svg = render_line_chart(&[], &[], Scale::Log);
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<polyline"));
    }
}

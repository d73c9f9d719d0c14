use crate::chart::svg::escape;
use crate::chart::EquityChart;
use crate::engine::ChartData;

const PAGE_TITLE: &str = "Backtesting Tool";

const STYLE: &str = "body{font-family:Arial,sans-serif;margin:24px;color:#222}\
h1{font-size:28px;margin:0 0 8px}\
.meta{color:#666;font-size:13px;margin-bottom:16px}\
.columns{display:flex;gap:24px;width:100%}\
.column{flex:1 1 0;min-width:0}\
.chart-title{font-size:15px;font-weight:bold;margin-bottom:6px}\
svg{width:100%;height:auto}";

fn chart_column(chart: &EquityChart) -> String {
    format!(
        r#"<div class="column"><div class="chart-title">{title}</div>{svg}</div>"#,
        title = escape(&chart.title),
        svg = chart.svg
    )
}

//self-contained html page with the linear and log charts side by side
pub fn render_dashboard(data: &ChartData) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{PAGE_TITLE}</title><style>{STYLE}</style>"));
    html.push_str("</head><body>");
    html.push_str(&format!("<h1>{PAGE_TITLE}</h1>"));
    html.push_str(&format!(
        r#"<div class="meta">Sheet {dataset} &middot; returns key {field} &middot; {days} days</div>"#,
        dataset = escape(&data.dataset_key),
        field = escape(&data.field_name),
        days = data.dates.len(),
    ));

    html.push_str(r#"<div class="columns">"#);
    html.push_str(&chart_column(&data.linear_chart));
    html.push_str(&chart_column(&data.log_chart));
    html.push_str("</div></body></html>");
    html
}

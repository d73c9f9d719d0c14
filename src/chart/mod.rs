pub mod dashboard;
pub mod svg;

pub use dashboard::render_dashboard;

use serde::{Deserialize, Serialize};

pub const STRATEGY_SERIES: &str = "Strategy Equity";
pub const BENCHMARK_SERIES: &str = "Buy and Hold Equity";
pub const X_AXIS_TITLE: &str = "Date";
pub const Y_AXIS_TITLE: &str = "Equity";
pub const LEGEND_TITLE: &str = "Equity Curves";

//y-axis scale of an equity chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Linear,
    Log,
}

impl Scale {
    pub fn title_suffix(self) -> &'static str {
        match self {
            Scale::Linear => "(Linear Scale)",
            Scale::Log => "(Log Scale)",
        }
    }
}

//one rendered strategy vs buy-and-hold chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityChart {
    pub title: String,
    pub scale: Scale,
    pub dates: Vec<String>,
    pub strategy: Vec<f64>,
    pub benchmark: Vec<f64>,
    pub svg: String,
}

//draws both curves against the date axis on the given scale
//
//strategy and benchmark are expected without their seed point, one value per date.
//a longer series is cut to the date axis.
pub fn render_equity_chart(
    dates: &[String],
    strategy: &[f64],
    benchmark: &[f64],
    scale: Scale,
) -> EquityChart {
    let len = dates.len();
    let strategy = &strategy[..strategy.len().min(len)];
    let benchmark = &benchmark[..benchmark.len().min(len)];

    let title = format!(
        "Strategy Equity vs. Buy and Hold Over Time {}",
        scale.title_suffix()
    );

    let svg = svg::render_line_chart(
        dates,
        &[
            svg::LineSeries::new(STRATEGY_SERIES, svg::STRATEGY_COLOR, strategy),
            svg::LineSeries::new(BENCHMARK_SERIES, svg::BENCHMARK_COLOR, benchmark),
        ],
        scale,
    );

    EquityChart {
        title,
        scale,
        dates: dates.to_vec(),
        strategy: strategy.to_vec(),
        benchmark: benchmark.to_vec(),
        svg,
    }
}

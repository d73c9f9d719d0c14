pub mod export;
pub mod summary;

pub use export::{save_chart_json, save_dashboard_html, save_equity_csv};
pub use summary::BacktestSummary;

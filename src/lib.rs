//strategy vs buy-and-hold equity curves from daily returns and tpi signals

pub mod chart;
pub mod config;
pub mod data;
pub mod engine;
pub mod equity;
pub mod report;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::chart::{render_dashboard, render_equity_chart, EquityChart, Scale};
    pub use crate::config::BacktestConfiguration;
    pub use crate::data::{
        load_signals_csv, parse_signals, CsvWorkbookProvider, InMemoryProvider, ProviderError,
        ReturnsProvider, SignalError, SignalSeries,
    };
    pub use crate::engine::{
        run_backtest, BacktestEngine, BacktestError, BacktestRequest, ChartData, SignalUpload,
    };
    pub use crate::equity::{calculate_equities, EquityCache, EquityCurves, Position};
    pub use crate::report::{save_chart_json, save_dashboard_html, save_equity_csv, BacktestSummary};
}

pub mod backtest;

pub use backtest::{
    run_backtest, BacktestEngine, BacktestError, BacktestRequest, ChartData, SignalUpload,
};

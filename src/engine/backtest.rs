use crate::chart::{render_equity_chart, EquityChart, Scale};
use crate::data::{
    load_signals_csv, parse_signals, ProviderError, ReturnsProvider, SignalError, SignalSeries,
};
use crate::equity::{calculate_equities, EquityCache, EquityCurves};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Please enter the sheet name, key for daily returns, and upload a CSV file (missing {0})")]
    MissingInput(&'static str),
    #[error(transparent)]
    Schema(SignalError),
    #[error("Error fetching data or processing backtest: {0}")]
    SignalRead(SignalError),
    #[error("Error fetching data or processing backtest: {0}")]
    Provider(#[from] ProviderError),
}

//column and value problems are schema errors, anything else failed the read itself
impl From<SignalError> for BacktestError {
    fn from(err: SignalError) -> Self {
        match err {
            SignalError::MissingColumns | SignalError::InvalidSignal { .. } => {
                BacktestError::Schema(err)
            }
            SignalError::Csv(_) => BacktestError::SignalRead(err),
        }
    }
}

//where the signal csv comes from
#[derive(Debug, Clone)]
pub enum SignalUpload {
    File(PathBuf),
    Bytes(Vec<u8>),
    Parsed(SignalSeries),
}

impl SignalUpload {
    fn load(&self) -> Result<SignalSeries, SignalError> {
        match self {
            SignalUpload::File(path) => load_signals_csv(path),
            SignalUpload::Bytes(bytes) => parse_signals(bytes.as_slice()),
            SignalUpload::Parsed(series) => Ok(series.clone()),
        }
    }
}

//everything a single backtest needs
#[derive(Debug, Clone)]
pub struct BacktestRequest {
    pub dataset_key: String,
    pub field_name: String,
    pub uploaded_signals: Option<SignalUpload>,
}

impl BacktestRequest {
    pub fn new(dataset_key: &str, field_name: &str, uploaded_signals: SignalUpload) -> Self {
        BacktestRequest {
            dataset_key: dataset_key.to_string(),
            field_name: field_name.to_string(),
            uploaded_signals: Some(uploaded_signals),
        }
    }

    fn validate(&self) -> Result<&SignalUpload, BacktestError> {
        if self.dataset_key.trim().is_empty() {
            return Err(BacktestError::MissingInput("sheet name"));
        }
        if self.field_name.trim().is_empty() {
            return Err(BacktestError::MissingInput("daily returns key"));
        }
        self.uploaded_signals
            .as_ref()
            .ok_or(BacktestError::MissingInput("signal csv"))
    }
}

//result of a backtest, ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub dataset_key: String,
    pub field_name: String,
    pub dates: Vec<String>,
    pub curves: EquityCurves,
    pub linear_chart: EquityChart,
    pub log_chart: EquityChart,
}

impl ChartData {
    //strategy equity per date, seed dropped
    pub fn strategy(&self) -> &[f64] {
        self.curves.without_seed().0
    }

    //buy-and-hold equity per date, seed dropped
    pub fn benchmark(&self) -> &[f64] {
        self.curves.without_seed().1
    }
}

//runs one backtest: load signals, fetch returns, fold, render both scales
pub fn run_backtest(
    request: &BacktestRequest,
    provider: &dyn ReturnsProvider,
    cache: Option<&EquityCache>,
) -> Result<ChartData, BacktestError> {
    let upload = request.validate()?;
    let dataset_key = request.dataset_key.trim();
    let field_name = request.field_name.trim();

    let signals = upload.load()?;
    let daily_returns = provider.get_returns(dataset_key, field_name)?;

    if daily_returns.len() < signals.len() {
        warn!(
            returns = daily_returns.len(),
            signals = signals.len(),
            "returns series shorter than signals, equity frozen after last return"
        );
    }

    let curves = match cache {
        Some(cache) => cache.get_or_compute(&daily_returns, &signals.tpi),
        None => calculate_equities(&daily_returns, &signals.tpi),
    };

    let (strategy, benchmark) = curves.without_seed();
    let dates = &signals.dates;
    let (linear_chart, log_chart) = rayon::join(
        || render_equity_chart(dates, strategy, benchmark, Scale::Linear),
        || render_equity_chart(dates, strategy, benchmark, Scale::Log),
    );

    info!(
        dataset = dataset_key,
        field = field_name,
        days = signals.len(),
        strategy_final = curves.final_strategy(),
        benchmark_final = curves.final_benchmark(),
        "backtest complete"
    );

    Ok(ChartData {
        dataset_key: dataset_key.to_string(),
        field_name: field_name.to_string(),
        dates: signals.dates,
        curves,
        linear_chart,
        log_chart,
    })
}

//backtest runner owning its returns provider and result cache
pub struct BacktestEngine {
    provider: Box<dyn ReturnsProvider>,
    cache: EquityCache,
}

impl BacktestEngine {
    pub fn new(provider: Box<dyn ReturnsProvider>, cache: EquityCache) -> Self {
        BacktestEngine { provider, cache }
    }

    pub fn run(&self, request: &BacktestRequest) -> Result<ChartData, BacktestError> {
        run_backtest(request, self.provider.as_ref(), Some(&self.cache))
    }

    //returns a reference to the cache
    pub fn cache(&self) -> &EquityCache {
        &self.cache
    }
}

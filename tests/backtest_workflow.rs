use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tpi_backtest::prelude::*;

fn write_workbook(dir: &Path) {
    fs::write(
        dir.join("R1.csv"),
        "date,daily_returns,btc_returns\n\
         2024-01-01,0.10,0.02\n\
         2024-01-02,0.10,-0.01\n\
         2024-01-03,-0.05,0.03\n",
    )
    .unwrap();
}

fn write_signals(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("tpi.csv");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_short_strategy_against_workbook() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path());
    let signals = write_signals(dir.path(), "date,tpi\n2024-01-01,-1\n2024-01-02,-1\n");

    let provider = CsvWorkbookProvider::new(dir.path());
    let request = BacktestRequest::new("R1", "daily_returns", SignalUpload::File(signals));
    let data = run_backtest(&request, &provider, None).unwrap();

    assert_eq!(data.curves.strategy.len(), 3);
    assert!((data.strategy()[1] - 0.81).abs() < 1e-12);
    assert!((data.benchmark()[1] - 1.21).abs() < 1e-12);
}

#[test]
fn test_signals_longer_than_returns_freeze() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path());
    let signals = write_signals(
        dir.path(),
        "date,tpi\n2024-01-01,1\n2024-01-02,1\n2024-01-03,1\n2024-01-04,1\n2024-01-05,1\n",
    );

    let provider = CsvWorkbookProvider::new(dir.path());
    let request = BacktestRequest::new("R1", "daily_returns", SignalUpload::File(signals));
    let data = run_backtest(&request, &provider, None).unwrap();

    assert_eq!(data.dates.len(), 5);
    assert_eq!(data.curves.len(), 6);
    assert_eq!(data.strategy()[4], data.strategy()[2]);
    assert_eq!(data.benchmark()[4], data.benchmark()[2]);
    assert_eq!(data.curves.strategy, data.curves.benchmark);
}

#[test]
fn test_missing_tpi_column_is_schema_error() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path());
    let signals = write_signals(dir.path(), "date,position\n2024-01-01,1\n");

    let provider = CsvWorkbookProvider::new(dir.path());
    let request = BacktestRequest::new("R1", "daily_returns", SignalUpload::File(signals));
    let err = run_backtest(&request, &provider, None).unwrap_err();

    assert!(matches!(err, BacktestError::Schema(SignalError::MissingColumns)));
}

#[test]
fn test_unknown_sheet_is_provider_error() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path());
    let signals = write_signals(dir.path(), "date,tpi\n2024-01-01,1\n");

    let provider = CsvWorkbookProvider::new(dir.path());
    let request = BacktestRequest::new("R7", "daily_returns", SignalUpload::File(signals));
    let err = run_backtest(&request, &provider, None).unwrap_err();

    assert!(matches!(err, BacktestError::Provider(ProviderError::DatasetNotFound(_))));
    assert!(err
        .to_string()
        .starts_with("Error fetching data or processing backtest:"));
}

#[test]
fn test_engine_from_configuration_writes_outputs() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path());
    let signals = write_signals(
        dir.path(),
        "date,tpi\n2024-01-01,1\n2024-01-02,0\n2024-01-03,-1\n",
    );

    let configuration = BacktestConfiguration {
        returns_dir: dir.path().to_path_buf(),
        returns_field: "btc_returns".to_string(),
        signals_path: Some(signals.clone()),
        ..Default::default()
    };

    let engine = BacktestEngine::new(
        Box::new(CsvWorkbookProvider::new(&configuration.returns_dir)),
        configuration.build_cache(),
    );
    let request = BacktestRequest::new(
        &configuration.sheet_name,
        &configuration.returns_field,
        SignalUpload::File(signals),
    );
    let data = engine.run(&request).unwrap();
    engine.run(&request).unwrap();
    assert_eq!(engine.cache().hits(), 1);

    let expected = calculate_equities(&[0.02, -0.01, 0.03], &[1.0, 0.0, -1.0]);
    assert_eq!(data.curves, expected);

    let html = dir.path().join("out.html");
    let csv = dir.path().join("out.csv");
    save_dashboard_html(&data, &html).unwrap();
    save_equity_csv(&data, &csv).unwrap();

    assert!(fs::read_to_string(&html).unwrap().contains("Strategy Equity"));
    assert_eq!(fs::read_to_string(&csv).unwrap().lines().count(), 4);
}

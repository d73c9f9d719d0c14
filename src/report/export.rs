use crate::chart::render_dashboard;
use crate::engine::ChartData;
use anyhow::{Context, Result};
use std::path::Path;

//writes one row per date with both equity values, seed excluded
pub fn save_equity_csv<P: AsRef<Path>>(data: &ChartData, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create equity csv {:?}", path))?;

    writer.write_record(["date", "strategy_equity", "buy_and_hold_equity"])?;
    for ((date, strategy), benchmark) in data
        .dates
        .iter()
        .zip(data.strategy())
        .zip(data.benchmark())
    {
        let strategy = strategy.to_string();
        let benchmark = benchmark.to_string();
        writer.write_record([date.as_str(), strategy.as_str(), benchmark.as_str()])?;
    }
    writer.flush()?;

    Ok(())
}

pub fn save_dashboard_html<P: AsRef<Path>>(data: &ChartData, path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render_dashboard(data))
        .with_context(|| format!("Failed to write dashboard {:?}", path))?;
    Ok(())
}

pub fn save_chart_json<P: AsRef<Path>>(data: &ChartData, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write chart json {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryProvider;
    use crate::engine::{run_backtest, BacktestRequest, SignalUpload};
    use tempfile::TempDir;

    fn chart_data() -> ChartData {
        let provider = InMemoryProvider::new().with_series("R1", "ret", vec![0.5, -0.5]);
        let request = BacktestRequest::new(
            "R1",
            "ret",
            SignalUpload::Bytes(b"date,tpi\n2024-01-01,1\n2024-01-02,0\n".to_vec()),
        );
        run_backtest(&request, &provider, None).unwrap()
    }

    #[test]
    fn test_equity_csv_rows_match_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equity.csv");
        save_equity_csv(&chart_data(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "date,strategy_equity,buy_and_hold_equity");
        assert_eq!(lines[1], "2024-01-01,1.5,1.5");
        assert_eq!(lines[2], "2024-01-02,1.5,0.75");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_dashboard_has_both_charts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.html");
        save_dashboard_html(&chart_data(), &path).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<title>Backtesting Tool</title>"));
        assert!(html.contains("(Linear Scale)"));
        assert!(html.contains("(Log Scale)"));
        assert_eq!(html.matches("<svg").count(), 2);
    }

    #[test]
    fn test_chart_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.json");
        let data = chart_data();
        save_chart_json(&data, &path).unwrap();

        let loaded: ChartData =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.curves, data.curves);
        assert_eq!(loaded.dates, data.dates);
    }
}

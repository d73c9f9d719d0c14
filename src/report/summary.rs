use crate::engine::ChartData;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

//end-of-run figures taken straight from the equity curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub dataset_key: String,
    pub field_name: String,
    pub days: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub strategy_final: f64,
    pub benchmark_final: f64,
}

impl BacktestSummary {
    pub fn from_chart_data(data: &ChartData) -> Self {
        BacktestSummary {
            dataset_key: data.dataset_key.clone(),
            field_name: data.field_name.clone(),
            days: data.dates.len(),
            first_date: data.dates.first().cloned(),
            last_date: data.dates.last().cloned(),
            strategy_final: data.curves.final_strategy(),
            benchmark_final: data.curves.final_benchmark(),
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Field"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Sheet"),
            Cell::new(&self.dataset_key),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Returns Key"),
            Cell::new(&self.field_name),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Days"),
            Cell::new(&self.days.to_string()),
        ]));

        if let (Some(first), Some(last)) = (&self.first_date, &self.last_date) {
            table.add_row(Row::new(vec![
                Cell::new("Period"),
                Cell::new(&format!("{} to {}", first, last)),
            ]));
        }

        table.add_row(Row::new(vec![
            Cell::new("Strategy Equity"),
            Cell::new(&format!("{:.4}x", self.strategy_final)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Buy and Hold Equity"),
            Cell::new(&format!("{:.4}x", self.benchmark_final)),
        ]));

        table
    }

    //prints the summary in a formatted table
    pub fn pretty_print_table(&self) {
        self.to_table().printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryProvider;
    use crate::engine::{run_backtest, BacktestRequest, SignalUpload};

    #[test]
    fn test_summary_from_chart_data() {
        let provider = InMemoryProvider::new().with_series("R1", "ret", vec![0.10, 0.10]);
        let request = BacktestRequest::new(
            "R1",
            "ret",
            SignalUpload::Bytes(b"date,tpi\n2024-01-01,-1\n2024-01-02,-1\n".to_vec()),
        );
        let data = run_backtest(&request, &provider, None).unwrap();
        let summary = BacktestSummary::from_chart_data(&data);

        assert_eq!(summary.days, 2);
        assert_eq!(summary.first_date.as_deref(), Some("2024-01-01"));
        assert!((summary.strategy_final - 0.81).abs() < 1e-12);
        assert!((summary.benchmark_final - 1.21).abs() < 1e-12);

        let rendered = summary.to_table().to_string();
        assert!(rendered.contains("0.8100x"));
        assert!(rendered.contains("2024-01-01 to 2024-01-02"));
    }
}

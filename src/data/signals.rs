use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DATE_COLUMN: &str = "date";
pub const TPI_COLUMN: &str = "tpi";

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("the file must contain both 'tpi' and 'date' columns")]
    MissingColumns,
    #[error("invalid tpi value '{value}' at line {line}")]
    InvalidSignal { line: u64, value: String },
    #[error("failed to read signal csv: {0}")]
    Csv(#[from] csv::Error),
}

//dated tpi signals in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSeries {
    pub dates: Vec<String>,
    pub tpi: Vec<f64>,
}

impl SignalSeries {
    pub fn new(dates: Vec<String>, tpi: Vec<f64>) -> Self {
        SignalSeries { dates, tpi }
    }

    pub fn len(&self) -> usize {
        self.tpi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tpi.is_empty()
    }

    //dates as calendar days, None unless every label is yyyy-mm-dd
    pub fn parsed_dates(&self) -> Option<Vec<NaiveDate>> {
        parse_date_labels(&self.dates)
    }
}

pub fn parse_date_labels(labels: &[String]) -> Option<Vec<NaiveDate>> {
    labels
        .iter()
        .map(|label| NaiveDate::parse_from_str(label.trim(), "%Y-%m-%d").ok())
        .collect()
}

//loads signals from a csv file with date and tpi columns
pub fn load_signals_csv<P: AsRef<Path>>(path: P) -> Result<SignalSeries, SignalError> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path.as_ref())?;
    read_signals(reader)
}

//parses signals from any csv source, e.g. an uploaded file body
pub fn parse_signals<R: Read>(source: R) -> Result<SignalSeries, SignalError> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(source);
    read_signals(reader)
}

fn read_signals<R: Read>(mut reader: csv::Reader<R>) -> Result<SignalSeries, SignalError> {
    let headers = reader.headers()?.clone();
    let (date_idx, tpi_idx) = match (
        column_index(&headers, DATE_COLUMN),
        column_index(&headers, TPI_COLUMN),
    ) {
        (Some(date_idx), Some(tpi_idx)) => (date_idx, tpi_idx),
        _ => return Err(SignalError::MissingColumns),
    };

    let mut series = SignalSeries::default();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let date = record.get(date_idx).unwrap_or_default().to_string();
        let raw = record.get(tpi_idx).unwrap_or_default().trim();

        //blank or absent cells are missing signals and count as flat
        let signal = if raw.is_empty() {
            f64::NAN
        } else {
            raw.parse::<f64>().map_err(|_| SignalError::InvalidSignal {
                line,
                value: raw.to_string(),
            })?
        };

        series.dates.push(date);
        series.tpi.push(signal);
    }

    debug!(rows = series.len(), "loaded tpi signals");

    Ok(series)
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

use csv::{ReaderBuilder, Trim};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("dataset '{0}' not found")]
    DatasetNotFound(String),
    #[error("field '{field}' not found in dataset '{dataset}'")]
    FieldNotFound { dataset: String, field: String },
    #[error("invalid return value '{value}' in field '{field}' at line {line}")]
    InvalidValue {
        field: String,
        line: u64,
        value: String,
    },
    #[error("failed to read dataset '{dataset}': {source}")]
    Csv {
        dataset: String,
        #[source]
        source: csv::Error,
    },
}

//lookup of a daily returns series by dataset key and field name
pub trait ReturnsProvider: Send + Sync {
    fn get_returns(&self, dataset_key: &str, field_name: &str) -> Result<Vec<f64>, ProviderError>;
}

//a directory of csv sheets, dataset key R1 maps to <root>/R1.csv
#[derive(Debug, Clone)]
pub struct CsvWorkbookProvider {
    root: PathBuf,
}

impl CsvWorkbookProvider {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        CsvWorkbookProvider { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    //path of the sheet for a dataset key
    pub fn sheet_path(&self, dataset_key: &str) -> PathBuf {
        self.root.join(format!("{dataset_key}.csv"))
    }
}

impl ReturnsProvider for CsvWorkbookProvider {
    fn get_returns(&self, dataset_key: &str, field_name: &str) -> Result<Vec<f64>, ProviderError> {
        //keys are plain sheet names, never paths
        if dataset_key.is_empty() || dataset_key.contains(['/', '\\']) || dataset_key == ".." {
            return Err(ProviderError::DatasetNotFound(dataset_key.to_string()));
        }

        let path = self.sheet_path(dataset_key);
        if !path.is_file() {
            return Err(ProviderError::DatasetNotFound(dataset_key.to_string()));
        }

        let csv_err = |source| ProviderError::Csv {
            dataset: dataset_key.to_string(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(&path)
            .map_err(csv_err)?;

        let column = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .position(|h| h == field_name)
            .ok_or_else(|| ProviderError::FieldNotFound {
                dataset: dataset_key.to_string(),
                field: field_name.to_string(),
            })?;

        let mut returns = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_err)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let raw = record.get(column).unwrap_or_default();

            let value = raw.parse::<f64>().map_err(|_| ProviderError::InvalidValue {
                field: field_name.to_string(),
                line,
                value: raw.to_string(),
            })?;
            returns.push(value);
        }

        debug!(
            dataset = dataset_key,
            field = field_name,
            days = returns.len(),
            "loaded daily returns"
        );

        Ok(returns)
    }
}

//returns series held in memory, keyed by (dataset, field)
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: IndexMap<(String, String), Vec<f64>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        InMemoryProvider::default()
    }

    pub fn insert(&mut self, dataset_key: &str, field_name: &str, returns: Vec<f64>) {
        self.series
            .insert((dataset_key.to_string(), field_name.to_string()), returns);
    }

    pub fn with_series(mut self, dataset_key: &str, field_name: &str, returns: Vec<f64>) -> Self {
        self.insert(dataset_key, field_name, returns);
        self
    }
}

impl ReturnsProvider for InMemoryProvider {
    fn get_returns(&self, dataset_key: &str, field_name: &str) -> Result<Vec<f64>, ProviderError> {
        if let Some(returns) = self
            .series
            .get(&(dataset_key.to_string(), field_name.to_string()))
        {
            return Ok(returns.clone());
        }

        if self.series.keys().any(|(dataset, _)| dataset == dataset_key) {
            Err(ProviderError::FieldNotFound {
                dataset: dataset_key.to_string(),
                field: field_name.to_string(),
            })
        } else {
            Err(ProviderError::DatasetNotFound(dataset_key.to_string()))
        }
    }
}

pub mod returns;
pub mod signals;

pub use returns::{CsvWorkbookProvider, InMemoryProvider, ProviderError, ReturnsProvider};
pub use signals::{load_signals_csv, parse_signals, SignalError, SignalSeries};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tpi_backtest::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tpi-backtest")]
#[command(about = "Strategy vs buy-and-hold equity curves from daily returns and TPI signals", long_about = None)]
struct Cli {
    //log library diagnostics at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //json configuration file, flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        //directory holding the returns sheets (<sheet>.csv)
        #[arg(long)]
        returns_dir: Option<PathBuf>,

        //sheet name (eg R1)
        #[arg(long)]
        sheet: Option<String>,

        //column holding the daily returns (eg daily_returns)
        #[arg(long)]
        field: Option<String>,

        //csv with date and tpi columns
        #[arg(long)]
        signals: Option<PathBuf>,

        //seconds a cached result stays valid
        #[arg(long)]
        cache_ttl: Option<u64>,

        //output options
        //output path for the html dashboard
        #[arg(long)]
        output_html: Option<PathBuf>,

        //output path for equity curve csv
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,

        //output path for chart data json
        #[arg(long)]
        output_json: Option<PathBuf>,
    },

    //write a default configuration file
    InitConfig {
        //where to write the json
        path: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            returns_dir,
            sheet,
            field,
            signals,
            cache_ttl,
            output_html,
            output_equity_csv,
            output_json,
        } => {
            let mut configuration = match config {
                Some(path) => BacktestConfiguration::from_json_file(&path)?,
                None => BacktestConfiguration::default(),
            };

            if let Some(dir) = returns_dir {
                configuration.returns_dir = dir;
            }
            if let Some(sheet) = sheet {
                configuration.sheet_name = sheet;
            }
            if let Some(field) = field {
                configuration.returns_field = field;
            }
            if signals.is_some() {
                configuration.signals_path = signals;
            }
            if let Some(ttl) = cache_ttl {
                configuration.cache_ttl_secs = ttl;
            }
            if output_html.is_some() {
                configuration.output_html = output_html;
            }
            if output_equity_csv.is_some() {
                configuration.output_equity_csv = output_equity_csv;
            }
            if output_json.is_some() {
                configuration.output_json = output_json;
            }

            run(&configuration)?;
        }
        Commands::InitConfig { path } => {
            BacktestConfiguration::default().to_json_file(&path)?;
            println!("Default configuration written to {:?}", path);
        }
    }

    Ok(())
}

fn run(configuration: &BacktestConfiguration) -> Result<()> {
    println!("TPI Backtesting Tool");
    println!("====================\n");

    println!(
        "Loading returns '{}' from sheet {} in {:?}...",
        configuration.returns_field, configuration.sheet_name, configuration.returns_dir
    );
    if let Some(path) = &configuration.signals_path {
        println!("Loading signals from {:?}...\n", path);
    }

    let engine = BacktestEngine::new(
        Box::new(CsvWorkbookProvider::new(&configuration.returns_dir)),
        configuration.build_cache(),
    );

    let request = BacktestRequest {
        dataset_key: configuration.sheet_name.clone(),
        field_name: configuration.returns_field.clone(),
        uploaded_signals: configuration.signals_path.clone().map(SignalUpload::File),
    };

    let data = engine.run(&request).context("Backtest failed")?;

    println!("Backtest Results");
    println!("================\n");
    BacktestSummary::from_chart_data(&data).pretty_print_table();

    //save outputs if requested
    if let Some(path) = &configuration.output_html {
        save_dashboard_html(&data, path)?;
        println!("\nDashboard saved to {:?}", path);
    }

    if let Some(path) = &configuration.output_equity_csv {
        save_equity_csv(&data, path)?;
        println!("Equity curves saved to {:?}", path);
    }

    if let Some(path) = &configuration.output_json {
        save_chart_json(&data, path)?;
        println!("Chart data saved to {:?}", path);
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use receipt_tally::{insert, list, run, run_async, JsonlStore, SummaryOptions, DEFAULT_CHART_WIDTH};

/// Stores scanned receipts and summarizes spending per category.
#[derive(Parser)]
#[command(name = "receipt-tally", version)]
struct Cli {
    /// JSON-lines file holding the receipt collection
    #[arg(long, env = "RECEIPT_TALLY_STORE", default_value = "data/receipts.jsonl", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save a receipt JSON document to the collection
    Insert {
        /// File containing one JSON object
        file: PathBuf,
    },
    /// Print every stored receipt
    List,
    /// Print per-category totals as a chart and a table
    Summary {
        /// Stream the collection through the async pipeline
        #[arg(long)]
        streaming: bool,

        /// Width of the longest chart bar
        #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
        chart_width: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run_cli(Cli::parse()) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut store = JsonlStore::new(cli.store);
    match cli.command {
        Command::Insert { file } => {
            let payload = fs::read_to_string(file)?;
            insert(&mut store, &payload, io::stdout())?;
        }
        Command::List => list(&store, io::stdout())?,
        Command::Summary {
            streaming,
            chart_width,
        } => {
            let options = SummaryOptions { chart_width };
            if streaming {
                let runtime = tokio::runtime::Runtime::new()?;
                runtime
                    .block_on(run_async(store.path(), &options, io::stdout()))
                    .map_err(|err| err as Box<dyn Error>)?;
            } else {
                run(&store, &options, io::stdout())?;
            }
        }
    }
    Ok(())
}

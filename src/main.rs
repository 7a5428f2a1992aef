use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fcm_export::convert::{self, RunOptions};
use fcm_export::{ConvertError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;
    match cli.command {
        Command::Convert(args) => execute_convert(args),
    }
}

fn execute_convert(args: ConvertArgs) -> Result<()> {
    // Named files take priority; the directory is only consulted (and
    // therefore only validated) when no --input was given.
    let candidates = convert::collect_candidates(&args.input, args.input_dir.as_deref())?;
    let options = RunOptions {
        output_dir: args.output,
        raw_mode: args.raw,
    };
    convert::convert_batch(&candidates, &options)?;
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| ConvertError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert season-report spreadsheets into per-season JSON documents."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a set of spreadsheets and refresh the season manifest.
    Convert(ConvertArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Spreadsheet file to convert; may be repeated. Takes priority over
    /// --input-dir.
    #[arg(long = "input", value_name = "FILE")]
    input: Vec<PathBuf>,

    /// Directory scanned for .xls/.xlsx files when no --input is given.
    #[arg(long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// Output directory for the JSON documents, manifest, and run log.
    #[arg(long, value_name = "DIR")]
    output: PathBuf,

    /// Emit cell values as read, skipping normalization.
    #[arg(long)]
    raw: bool,
}

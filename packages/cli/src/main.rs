#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the address parser.
//!
//! Parses addresses given on the command line or in a CSV column and
//! prints the candidate locations as JSON. Log output goes through
//! [`openblock_cli_utils::init_logger`], so `RUST_LOG=debug` shows the
//! parse trace without breaking the batch progress bar.

mod output;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use openblock_address::batch::{parse_csv, write_jsonl};
use openblock_address::{AddressParser, AddressTables, normalize, strip_unit};
use openblock_cli_utils::AddressProgress;

#[derive(Parser)]
#[command(
    name = "openblock_address",
    about = "Free-text US street address parser"
)]
struct Cli {
    /// TOML file whose sections replace the built-in lookup tables
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse addresses and print every candidate location as JSON
    Parse {
        /// One or more free-text addresses
        #[arg(required = true)]
        addresses: Vec<String>,
        /// Print one JSON object per line instead of a pretty array
        #[arg(long)]
        compact: bool,
    },
    /// Show an address after normalization and unit stripping
    Normalize { address: String },
    /// List the fields each token could belong to
    Classify {
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    /// Parse the addresses in one column of a CSV file
    Batch {
        /// CSV file with a header row
        #[arg(long)]
        input: PathBuf,
        /// Header of the address column
        #[arg(long)]
        column: String,
        /// JSON lines output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Summarize the address shapes, or list those of one length
    Shapes {
        #[arg(long)]
        len: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = openblock_cli_utils::init_logger();
    let cli = Cli::parse();

    let custom;
    let parser = match &cli.tables {
        Some(path) => {
            custom = AddressParser::new(&AddressTables::from_path(path)?)?;
            &custom
        }
        None => AddressParser::builtin(),
    };

    match cli.command {
        Commands::Parse { addresses, compact } => {
            let mut failed = 0;
            for address in &addresses {
                match parser.parse(address) {
                    Ok(candidates) => {
                        println!("{}", output::render_candidates(&candidates, compact)?);
                    }
                    Err(e) => {
                        log::error!("{e}");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                let total = addresses.len();
                return Err(format!("{failed} of {total} addresses failed to parse").into());
            }
        }
        Commands::Normalize { address } => {
            let normalized = normalize(&address);
            println!("{normalized}");
            println!("{}", strip_unit(&normalized));
        }
        Commands::Classify { tokens } => {
            for token in &tokens {
                let token = normalize(token);
                let fields = parser.classifier().classify(&token);
                println!("{}", output::render_classes(&token, &fields));
            }
        }
        Commands::Batch {
            input,
            column,
            output: out_path,
        } => {
            let reader = BufReader::new(File::open(&input)?);
            let progress = AddressProgress::for_csv(&multi, &input.display().to_string());
            let report = parse_csv(parser, reader, &column, progress.as_ref())?;

            match out_path {
                Some(path) => {
                    write_jsonl(&report.records, BufWriter::new(File::create(&path)?))?;
                    log::info!(
                        "Wrote {} parsed rows to {}",
                        report.records.len(),
                        path.display()
                    );
                }
                None => write_jsonl(&report.records, std::io::stdout().lock())?,
            }
        }
        Commands::Shapes { len } => {
            let text = output::render_shapes(parser.shapes(), len);
            if len.is_some() && !text.is_empty() {
                println!("{text}");
            } else {
                print!("{text}");
            }
        }
    }

    Ok(())
}

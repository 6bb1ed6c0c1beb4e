//! Flood risk prediction CLI.
//!
//! Usage:
//!   flood_predict --input <path> [--output <path>]
//!
//! Options:
//!   --input PATH    Input feature CSV (required)
//!   --output PATH   Output CSV path (default: predictions.csv)
//!
//! Reads the three pre-trained artifacts from models/, predicts a flood
//! label, a flood probability, and a batch-relative risk tier per input row,
//! and writes the input table with those three columns appended.
//!
//! Exit status: 0 on success, 1 on any failure. Status and error lines go
//! to stdout; error lines are prefixed with "error:".

use std::path::PathBuf;

use floodcast::pipeline::{self, Artifacts, DEFAULT_OUTPUT};

struct Args {
    input: PathBuf,
    output: PathBuf,
}

const USAGE: &str = "flood_predict\n\n  --input <path>   Input feature CSV (required)\n  --output <path>  Output CSV path (default: predictions.csv)";

fn parse_args() -> Result<Args, String> {
    let mut input: Option<PathBuf> = None;
    let mut output = PathBuf::from(DEFAULT_OUTPUT);

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--input" => {
                let value = it.next().ok_or("--input requires a path")?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = it.next().ok_or("--output requires a path")?;
                output = PathBuf::from(value);
            }
            "--help" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    let input = input.ok_or("--input is required")?;
    Ok(Args { input, output })
}

fn fatal(message: impl std::fmt::Display) -> ! {
    println!("error: {message}");
    std::process::exit(1);
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{USAGE}");
            fatal(message);
        }
    };

    let artifacts = match Artifacts::load_default() {
        Ok(artifacts) => artifacts,
        Err(err) => fatal(err),
    };

    let table = match pipeline::read_input(&args.input) {
        Ok(table) => table,
        Err(err) => fatal(err),
    };
    println!(
        "loaded input data: {} rows x {} columns",
        table.n_rows(),
        table.n_columns()
    );

    let predictions = match artifacts.predict(&table) {
        Ok(predictions) => predictions,
        Err(err) => fatal(err),
    };

    if let Err(err) = pipeline::write_output(table, &predictions, &args.output) {
        fatal(err);
    }
    println!("predictions saved to {}", args.output.display());
}

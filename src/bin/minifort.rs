//! minifort command-line.
//!
//! Interprets the single source file given as argument.  Print output and diagnostics both go to
//! stdout, in program order.  Logs go to stderr.

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{self, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use minifort::interpreter::{Interpreter, RunError};

/// Interpreter for a small Fortran-like language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file to interpret.  Exactly one is expected.
    files: Vec<PathBuf>,

    /// Log interpreter activity to stderr (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,

    /// Print the token stream instead of interpreting the program.
    #[arg(long)]
    tokens: bool,
}

fn main() -> Result<ExitCode, anyhow::Error> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let path = match args.files.as_slice() {
        [] => {
            eprintln!("Missing File Name.");
            return Ok(ExitCode::FAILURE);
        }
        [path] => path,
        _ => {
            eprintln!("ONLY ONE FILE NAME ALLOWED");
            return Ok(ExitCode::FAILURE);
        }
    };
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            eprintln!("CANNOT OPEN {}", path.display());
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut output = io::stdout();
    let mut diagnostics = io::stdout();
    let mut interp = Interpreter::new(&mut output, &mut diagnostics);
    let reader = BufReader::new(file);

    if args.tokens {
        interp
            .dump_tokens(reader)
            .with_context(|| format!("failed to scan {}", path.display()))?;
        return Ok(ExitCode::SUCCESS);
    }

    match interp.run(reader) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(RunError::Failed { errors }) => {
            println!("\nStatus: Unsuccessful Execution \nNumber of Errors: {}", errors);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).with_context(|| format!("failed to interpret {}", path.display())),
    }
}

fn init_tracing(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

//! Gamma CLI - batch and interactive front ends for the Gamma engine.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::Parser;
use gamma::session::{self, SessionEnd};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Gamma - a territory-claiming board game
///
/// Reads a `B` (batch) or `I` (interactive) session from standard input.
#[derive(Parser, Debug)]
#[command(name = "gamma")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read the session from a file instead of standard input
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Format of the summary printed after an interactive game
    #[arg(short, long, default_value = "text")]
    summary: cli::SummaryFormat,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), cli::CliError> {
    let end = match &args.input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                cli::CliError::new(format!("Failed to read {}: {e}", path.display()))
            })?;
            run_session(BufReader::new(file))?
        }
        None => run_session(io::stdin().lock())?,
    };

    let SessionEnd::Interactive { game, .. } = end else {
        return Ok(());
    };

    if !cli::interactive::fits_terminal(&game)? {
        let (columns, rows) = cli::interactive::required_size(&game);
        println!("Terminal too small: enlarge it to at least {columns}x{rows} and try again.");
        return Ok(());
    }

    let game = cli::interactive::execute(game)?;
    let summary = cli::output::Summary::from_game(&game).render(args.summary)?;
    print!("{summary}");
    Ok(())
}

fn run_session<R: BufRead>(input: R) -> Result<SessionEnd, cli::CliError> {
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let end = session::run(input, &mut out, &mut err)?;
    out.flush()?;
    Ok(end)
}

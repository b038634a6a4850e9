mod error;
mod query;
mod transform;
mod verifier;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use error::{Error, Result};

/// Explicit-state LTL model checker over finite transition systems.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Path to the transition system description.
    ts_path: PathBuf,
    /// Path to the batch of LTL queries to check against it.
    queries_path: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "fatal error:".red(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ts_text = read_file(&cli.ts_path)?;
    let ts = ts::parse(&ts_text)?;

    let queries_text = read_file(&cli.queries_path)?;
    let batch = query::parse(&queries_text)?;

    let mut output = String::new();
    for formula in &batch.global {
        let verdict = verifier::check(&ts, formula);
        log::debug!("verdict for '{formula}': {}", verdict as u8);
        output.push_str(if verdict { "1\n" } else { "0\n" });
    }

    for (id, formula) in &batch.per_start {
        let state = ts
            .states()
            .into_iter()
            .find(|s| s.id == *id)
            .ok_or(Error::UnknownStartState(*id))?;
        let mut rooted = ts.clone();
        rooted.set_only_initial_state(state);

        let verdict = verifier::check(&rooted, formula);
        log::debug!("verdict for start state {id}, '{formula}': {}", verdict as u8);
        output.push_str(if verdict { "1\n" } else { "0\n" });
    }

    print!("{output}");
    Ok(())
}

fn read_file(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Io(path.display().to_string(), e))
}

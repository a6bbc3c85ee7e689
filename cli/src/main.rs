//! geo-solve: run the deduction engine on a JSON problem file

use clap::{ArgAction, Parser};
use geometrica_core::{load_problem, SolveReport, SolveStatus};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "geo-solve")]
#[command(about = "Derive lengths, angles and areas from given geometric facts")]
struct Args {
    /// Input problem file (JSON)
    problem: PathBuf,

    /// Override the fixpoint round cap
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Print the solve report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let problem = match load_problem(&args.problem) {
        Ok(problem) => problem,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(id = %problem.id, givens = problem.givens.len(), queries = problem.queries.len(), "loaded problem");

    let mut config = problem.solver_config();
    if let Some(max_rounds) = args.max_rounds {
        config.max_rounds = max_rounds;
    }
    let mut solver = match problem.build_with(config) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let report = solver.solve();

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&problem.id, &report);
    }

    match report.status {
        SolveStatus::Inconsistent => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    }
}

fn print_report(id: &str, report: &SolveReport) {
    println!("Problem: {}", id);
    println!(
        "Status: {} ({} rounds, {} facts)",
        report.status, report.rounds, report.facts
    );
    for answer in &report.answers {
        println!();
        let value = answer.display.as_deref().unwrap_or("?");
        let tag = if answer.proven { "" } else { " (numeric only)" };
        println!("{} = {}{}", answer.query, value, tag);
        println!("{}", answer.explanation);
    }
}

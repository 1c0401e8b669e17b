use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use agora_session::records::{write_balances_csv, write_tape_csv};
use agora_session::{ExperimentConfig, SessionReport, run_replications};
use log::info;

fn print_help() {
    eprintln!(
        r#"Agora - limit-order-book market simulator

USAGE:
    agora [OPTIONS]

OPTIONS:
    --config <PATH>     Load experiment configuration from JSON file
    --output <DIR>      Directory for tape.csv and balances.csv (default: .)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (e.g. agora_session=debug)

EXAMPLES:
    # Run the default experiment
    agora

    # Run a configured experiment, write records elsewhere
    agora --config experiment.json --output results/
"#
    );
}

fn write_records(dir: &Path, reports: &[SessionReport]) -> Result<(), Box<dyn std::error::Error>> {
    let tape_path = dir.join("tape.csv");
    write_tape_csv(File::create(&tape_path)?, reports)?;
    info!("wrote {}", tape_path.display());

    let balances_path = dir.join("balances.csv");
    write_balances_csv(File::create(&balances_path)?, reports)?;
    info!("wrote {}", balances_path.display());

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut output_dir = PathBuf::from(".");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return;
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--output" | "-o" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a directory argument");
                    process::exit(1);
                }
                output_dir = PathBuf::from(&args[i]);
            }
            other => {
                eprintln!("Error: unknown argument {other}");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match ExperimentConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        None => ExperimentConfig::default(),
    };

    let reports = match run_replications(&config) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    for report in &reports {
        info!(
            "session {}: {} orders, {} trades, volume {}",
            report.session_id, report.orders_submitted, report.trades_executed, report.volume
        );
        for balance in &report.balances {
            info!(
                "  {}: n={} total={} mean={}",
                balance.strategy, balance.traders, balance.total_profit, balance.mean_profit
            );
        }
    }

    if let Err(e) = write_records(&output_dir, &reports) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let total_trades: u64 = reports.iter().map(|r| r.trades_executed).sum();
    println!(
        "{} session(s) complete, {} trades, records in {}",
        reports.len(),
        total_trades,
        output_dir.display()
    );
}

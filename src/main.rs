mod config;
mod db;
mod error;
mod feed;
mod logging;
mod models;
mod operations;

use clap::Parser;
use config::{Cli, Command, Config};
use error::Result;
use feed::TransactionFeed;
use feed::ledger_feed::LedgerFeed;
use feed::live::LiveStatistics;
use operations::add::build_transaction;
use operations::remove::remove_transaction;
use operations::{dashboard, report};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(&cli)?;
    logging::init(config.log_file.as_deref())?;

    info!(database = %config.database_path.display(), user = %config.user_id, "opening ledger");
    let conn = db::connection::establish_connection(&config.database_path)?;
    let mut feed = LedgerFeed::new(conn, config.user_id.clone(), config.history_limit);

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Add {
            transaction_type,
            category,
            amount,
            date,
        } => {
            let new_transaction =
                build_transaction(&transaction_type, &category, &amount, date.as_deref())?;
            let created = feed.create(new_transaction)?;
            println!("Transaction added successfully! ID: {}", created.id);
        }
        Command::Remove { id } => {
            let removed = remove_transaction(&mut feed, &id)?;
            println!("Transaction {} removed successfully.", removed.id);
        }
        Command::List => {
            print!("{}", report::format_transactions(&feed.current_snapshot()?));
        }
        Command::Stats { json } => {
            let (live, _) = LiveStatistics::attach(&mut feed)?;
            let statistics = live.statistics();
            if json {
                println!("{}", report::statistics_json(&statistics)?);
            } else {
                print!("{}", report::format_statistics(&statistics));
            }
        }
        Command::Categories => {
            print!("{}", report::format_categories());
        }
        Command::Dashboard => {
            let (live, _) = LiveStatistics::attach(&mut feed)?;
            dashboard::run_dashboard(&mut feed, &live)?;
        }
    }

    Ok(())
}

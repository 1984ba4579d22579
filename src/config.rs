use crate::error::{AppError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "spendwise")]
#[command(about = "Track income and expenses and watch your savings balance")]
pub struct Cli {
    /// SQLite file holding the transactions
    #[arg(long, global = true, env = "SPENDWISE_DB", default_value = "spendwise.db")]
    pub database: PathBuf,

    /// User whose transactions are read and written
    #[arg(long, global = true, env = "SPENDWISE_USER", default_value = "local")]
    pub user: String,

    /// Number of most recent transactions kept in each snapshot
    #[arg(long, global = true, env = "SPENDWISE_HISTORY_LIMIT", default_value_t = 100)]
    pub history_limit: usize,

    /// Write logs here instead of stderr
    #[arg(long, global = true, env = "SPENDWISE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a transaction
    Add {
        /// Credit or Debit
        transaction_type: String,
        category: String,
        amount: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a transaction by id
    Remove { id: String },
    /// Print the recent transactions
    List,
    /// Print totals and the category breakdown
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Print the categories accepted for each type
    Categories,
    /// Open the interactive dashboard (the default)
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub user_id: String,
    pub history_limit: usize,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.history_limit == 0 {
            return Err(AppError::Config("history limit must be at least 1".to_string()));
        }
        let user_id = cli.user.trim();
        if user_id.is_empty() {
            return Err(AppError::Config("user id cannot be empty".to_string()));
        }

        Ok(Self {
            database_path: cli.database.clone(),
            user_id: user_id.to_string(),
            history_limit: cli.history_limit,
            log_file: cli.log_file.clone(),
        })
    }
}

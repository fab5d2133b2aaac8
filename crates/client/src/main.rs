//! `fintrack` command-line entry point.

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fintrack_client::config::parse_base_url;
use fintrack_client::{ClientConfig, LedgerStore};
use fintrack_core::{HISTORY_LIMIT, NewTransaction, TransactionId, TransactionKind};
use fintrack_observability::LogFormat;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "fintrack", about = "Income and expense ledger client")]
struct Cli {
    /// API base URL (overrides FINTRACK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token (overrides FINTRACK_AUTH_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Request timeout in seconds, 0 for none (overrides FINTRACK_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log format: json or pretty (overrides FINTRACK_LOG_FORMAT)
    #[arg(long)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals and balance over both collections
    Summary,
    /// Most recent transactions, newest first
    History {
        #[arg(long, default_value_t = HISTORY_LIMIT)]
        limit: usize,
    },
    /// Every record of one kind, in server order
    List { kind: TransactionKind },
    /// Create a record, then show the refreshed collection
    Add {
        kind: TransactionKind,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Date of the transaction as the API expects it (e.g. 2024-05-01)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a record, then show the refreshed collection
    Delete { kind: TransactionKind, id: TransactionId },
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid environment configuration")?;

    if let Some(url) = &cli.api_url {
        config.base_url = parse_base_url(url)?;
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    Ok(config)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    fintrack_observability::init_with(config.log_format);

    let store = LedgerStore::connect(&config).context("failed to start ledger session")?;

    match cli.command {
        Command::Summary => {
            store.refresh_all().await;
            let snapshot = store.snapshot();
            print_json(&json!({
                "incomes": snapshot.incomes.len(),
                "expenses": snapshot.expenses.len(),
                "total_income": snapshot.total_income(),
                "total_expenses": snapshot.total_expenses(),
                "total_balance": snapshot.total_balance(),
            }))?;
        }
        Command::History { limit } => {
            store.refresh_all().await;
            print_json(&serde_json::to_value(store.history(limit))?)?;
        }
        Command::List { kind } => {
            store.fetch(kind).await;
            print_json(&serde_json::to_value(store.collection(kind))?)?;
        }
        Command::Add {
            kind,
            amount,
            title,
            category,
            description,
            date,
        } => {
            let mut data = NewTransaction::new(kind, amount);
            for (key, value) in [
                ("title", title),
                ("category", category),
                ("description", description),
                ("date", date),
            ] {
                if let Some(value) = value {
                    data = data.with_detail(key, value);
                }
            }
            store.add(kind, data).await;
            print_json(&serde_json::to_value(store.collection(kind))?)?;
        }
        Command::Delete { kind, id } => {
            store.delete(kind, &id).await;
            print_json(&serde_json::to_value(store.collection(kind))?)?;
        }
    }

    if let Some(message) = store.error() {
        eprintln!("error: {message}");
        std::process::exit(1);
    }

    Ok(())
}

//! oxide-audit CLI
//!
//! Command-line tool for adding audit tables and triggers to MySQL tables.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_audit::prelude::*;

/// Trigger-based audit tables for MySQL.
#[derive(Parser)]
#[command(name = "oxide-audit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL.
    #[arg(short, long, env = "DATABASE_URL")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the statements needed to audit a table without executing them.
    Sql {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Create the audit table and triggers.
    Apply {
        #[command(flatten)]
        target: TargetArgs,

        /// Append every executed statement to this file.
        #[arg(short, long)]
        log_file: Option<PathBuf>,
    },

    /// Show which parts of the audit setup already exist.
    Status {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Table to audit.
    table: String,

    /// Audit table name (default: audit_<table>).
    #[arg(long)]
    audit_table: Option<String>,

    /// Fail if the audit table already exists.
    #[arg(long)]
    strict_audit_table: bool,

    /// Fail if any audit trigger already exists.
    #[arg(long)]
    strict_triggers: bool,
}

impl TargetArgs {
    fn options(&self) -> AuditOptions {
        let mut options = AuditOptions::new()
            .strict_if_audit_table_exists(self.strict_audit_table)
            .strict_if_triggers_exist(self.strict_triggers);
        if let Some(name) = &self.audit_table {
            options = options.audit_table(name.clone());
        }
        options
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let connection = MySqlConnection::connect(&cli.database).await?;

    match cli.command {
        Commands::Sql { target, format } => {
            let mut creator =
                AuditTableCreator::new(target.table.clone(), connection).options(target.options());
            let plan = creator.plan().await?;

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                Format::Text if plan.is_empty() => {
                    info!("Audit setup for {} is complete.", plan.target.table);
                }
                Format::Text => print!("{}", plan.to_script()),
            }
        }

        Commands::Apply { target, log_file } => {
            let mut creator =
                AuditTableCreator::new(target.table.clone(), connection).options(target.options());
            let plan = creator.execute(log_file.as_deref()).await?;

            info!(
                "Applied {} statement(s); {} part(s) already present.",
                plan.len(),
                plan.skipped.len()
            );
        }

        Commands::Status { target, format } => {
            let mut creator =
                AuditTableCreator::new(target.table.clone(), connection).options(target.options());
            let status = creator.status().await?;

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&status)?),
                Format::Text => {
                    let mark = |present: bool| if present { "X" } else { " " };
                    println!("\nAudit status for {}:", target.table);
                    println!("{:-<60}", "");
                    println!(" [{}] base table {}", mark(status.base_table_exists), target.table);
                    println!(
                        " [{}] audit table {}",
                        mark(status.audit_table_exists),
                        creator.audit_table_name()
                    );
                    for kind in TriggerKind::EMISSION_ORDER {
                        println!(
                            " [{}] trigger {}",
                            mark(status.trigger_exists(kind)),
                            AuditTarget::new(target.table.as_str()).trigger_name(kind)
                        );
                    }
                    println!();
                    if status.is_complete() {
                        println!("Audit setup is complete.");
                    } else {
                        println!("Audit setup is incomplete; run `oxide-audit apply`.");
                    }
                }
            }
        }
    }

    Ok(())
}

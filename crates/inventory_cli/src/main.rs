mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::InputArgs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dice")]
#[command(version, about = "Diamond inventory ingestion CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an inventory export
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Write the discrepancy report to this file (or into this directory)
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate an export and ask the advisory service for corrections
    Advise {
        #[command(flatten)]
        input: InputArgs,

        /// Advisory chat endpoint
        #[arg(long, env = "DICE_ADVISOR_URL")]
        endpoint: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate an export and upload the complete rows
    Upload {
        #[command(flatten)]
        input: InputArgs,

        /// Inventory upload endpoint
        #[arg(long, env = "DICE_UPLOAD_URL")]
        endpoint: Option<String>,

        /// Bearer token for the upload endpoint
        #[arg(long, env = "DICE_UPLOAD_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Show what would be uploaded without sending anything
        #[arg(long)]
        dry_run: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the fields of the diamond catalog
    Fields {
        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Validate {
            input,
            report,
            format,
        } => commands::validate::execute(&input, report.as_deref(), &format),

        Commands::Advise {
            input,
            endpoint,
            format,
        } => commands::advise::execute(&input, endpoint, &format).await,

        Commands::Upload {
            input,
            endpoint,
            token,
            dry_run,
            format,
        } => commands::upload::execute(&input, endpoint, token, dry_run, &format).await,

        Commands::Fields { format } => commands::fields::execute(&format),
    }
}

//! Bundle Kit CLI - Database migrations and feedback reports.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bk-cli migrate
//!
//! # Show feedback totals
//! bk-cli feedback summary
//!
//! # Show the latest feedback entries
//! bk-cli feedback recent --limit 20
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `feedback summary` - Good/bad feedback totals
//! - `feedback recent` - Most recent feedback entries

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bk-cli")]
#[command(author, version, about = "Bundle Kit CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Report on merchant feedback
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },
}

#[derive(Subcommand)]
enum FeedbackAction {
    /// Totals per feedback type
    Summary {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Most recent entries, newest first
    Recent {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Feedback { action } => match action {
            FeedbackAction::Summary { json } => commands::feedback::summary(json).await?,
            FeedbackAction::Recent { limit } => commands::feedback::recent(limit).await?,
        },
    }
    Ok(())
}

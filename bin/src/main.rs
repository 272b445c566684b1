//! trowel CLI - Incremental exchange-rate loader.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{debug, warn};

mod commands;
mod logging;
mod progress;
mod settings;

use commands::run::RunArgs;
use settings::Settings;

#[derive(Parser)]
#[command(name = "trowel")]
#[command(about = "Incremental exchange-rate loader with Jalali date normalization")]
#[command(
    long_about = "Incremental exchange-rate loader with Jalali date normalization.\n\n\
    Runs are not safe to execute concurrently against the same table: two \
    overlapping runs may both append the same records. Serialize runs with an \
    external lock (for example `flock`) when scheduling them."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and info logs)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, detect new records and append them to the database
    Run(RunArgs),

    /// List catalog instruments
    List {
        /// Filter by transaction type (bill, wire)
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// Search pattern
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show instrument details
    Info {
        /// Instrument id
        id: u32,
    },

    /// Show the resolved configuration
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Process env wins over .env, so load it before clap reads env fallbacks.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet, cli.settings.log_level())?;

    match &dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => debug!("no .env file"),
        Err(e) => warn!(error = %e, "ignoring unreadable .env"),
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Run(args) => commands::run::run(args, &cli.settings, cli.quiet).await,
        Commands::List {
            transaction_type,
            search,
        } => commands::list::list_instruments(transaction_type.as_deref(), search.as_deref()),
        Commands::Info { id } => commands::info::show_info(id),
        Commands::Config => commands::config::show_config(&cli.settings, dotenv.is_ok()),
    }
}

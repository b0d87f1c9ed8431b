use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fxc::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct PairOpts {
    /// Currency to convert from (defaults to config)
    #[arg(short, long)]
    from: Option<String>,

    /// Currency to convert to (defaults to config)
    #[arg(short, long)]
    to: Option<String>,
}

impl From<PairOpts> for fxc::PairArgs {
    fn from(opts: PairOpts) -> Self {
        fxc::PairArgs {
            from: opts.from,
            to: opts.to,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Refresh rates and show when they were last updated
    Sync,
    /// List known currency symbols
    Symbols,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        #[arg(default_value_t = 1.0)]
        amount: f64,

        #[command(flatten)]
        pair: PairOpts,

        /// Use the Nth favorite pair
        #[arg(long, conflicts_with_all = ["recent", "from", "to"])]
        favorite: Option<usize>,

        /// Use the Nth recently converted pair
        #[arg(long, conflicts_with_all = ["favorite", "from", "to"])]
        recent: Option<usize>,
    },
    /// Add a currency pair to favorites
    Favorite {
        #[command(flatten)]
        pair: PairOpts,
    },
    /// Show favorite and recent pairs
    Pairs,
    /// Show the rate chart for two weeks ending a week ago
    Chart {
        #[command(flatten)]
        pair: PairOpts,
    },
}

impl From<Commands> for fxc::AppCommand {
    fn from(cmd: Commands) -> fxc::AppCommand {
        match cmd {
            Commands::Sync => fxc::AppCommand::Sync,
            Commands::Symbols => fxc::AppCommand::Symbols,
            Commands::Convert {
                amount,
                pair,
                favorite,
                recent,
            } => fxc::AppCommand::Convert {
                amount,
                pair: pair.into(),
                saved: favorite
                    .map(fxc::SavedPair::Favorite)
                    .or(recent.map(fxc::SavedPair::Recent)),
            },
            Commands::Favorite { pair } => fxc::AppCommand::Favorite(pair.into()),
            Commands::Pairs => fxc::AppCommand::Pairs,
            Commands::Chart { pair } => fxc::AppCommand::Chart(pair.into()),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxc::cli::setup::setup(),
        Some(cmd) => fxc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

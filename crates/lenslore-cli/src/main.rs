use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{browse, clear, config, search, show, watched};
use lenslore_config::PathManager;
use logging::LogTarget;

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "lenslore")]
#[command(about = "Lenslore - Search movies and keep a rated list of what you've watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Terminal width in columns used to pick the layout (defaults to $COLUMNS)
    #[arg(long, global = true, value_name = "COLS")]
    width: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search session (default)
    #[command(long_about = "Start an interactive session. Type a title to search, then use commands like ':open 1', ':rate 8' and ':add' to build your watched list. Type ':help' for the full list.")]
    Browse {
        /// Keep the watched list in memory only; nothing is written to disk
        #[arg(long, action = ArgAction::SetTrue)]
        ephemeral: bool,
    },
    /// Search the catalog once and print the results
    Search {
        /// Title to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the full catalog record for one movie
    Show {
        /// IMDb id, e.g. tt0133093
        id: String,
    },
    /// Inspect or edit the watched list
    Watched {
        #[command(subcommand)]
        cmd: Option<WatchedCommands>,
    },
    /// Configure the catalog API key and settings
    #[command(long_about = "Manage configuration. The OMDb API key can also be supplied through the LENSLORE_OMDB_API_KEY environment variable, which takes priority over the config file.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear stored data
    #[command(long_about = "Clear stored data. Use --watched to empty the watched list, --logs to delete session logs, or --all for both.")]
    Clear {
        /// Clear the watched list and logs
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Empty the watched list
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,

        /// Delete session log files
        #[arg(long, action = ArgAction::SetTrue)]
        logs: bool,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum WatchedCommands {
    /// List watched movies (default)
    List,
    /// Averages across the watched list
    Summary,
    /// Fetch a movie and add it with your rating
    Add {
        /// IMDb id, e.g. tt0133093
        id: String,

        /// Your rating, 1-10 (prompts when omitted)
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Remove a movie from the list
    Remove {
        /// IMDb id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the OMDb API key in the config file
    SetKey {
        /// API key (if not provided, will prompt)
        key: Option<String>,
    },
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse { ephemeral: false });

    // The interactive screen owns stdout, so its logs go to a file
    let target = match command {
        Commands::Browse { .. } => LogTarget::File(PathManager::default().session_log_file()),
        _ => LogTarget::Stderr,
    };
    logging::init_logging(cli.verbose, cli.quiet, target).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match command {
        Commands::Browse { ephemeral } => browse::run_browse(ephemeral, cli.width, &output).await,
        Commands::Search { query } => search::run_search(&query.join(" "), &output).await,
        Commands::Show { id } => show::run_show(&id, &output).await,
        Commands::Watched { cmd } => {
            let cmd = cmd.unwrap_or(WatchedCommands::List);
            watched::run_watched(cmd, &output).await
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output)
        }
        Commands::Clear { all, watched, logs, yes } => clear::run_clear(all, watched, logs, yes, &output),
    }
}

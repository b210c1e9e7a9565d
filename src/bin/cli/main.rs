mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flashdeck_lib::sets::MergePolicy;

#[derive(Parser)]
#[command(name = "flashdeck-cli", about = "Flashcard sets from CSV files", version)]
struct Cli {
    /// Store location (default: config file, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PolicyArg {
    /// Keep existing cards, skip words already present
    AppendSkip,
    /// Overwrite cards with the same word, add the rest
    ReplaceOrAppend,
}

impl From<PolicyArg> for MergePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::AppendSkip => MergePolicy::AppendSkip,
            PolicyArg::ReplaceOrAppend => MergePolicy::ReplaceOrAppend,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StudyAction {
    /// Show the card under the cursor
    Current,
    /// Move to the next card
    Next,
    /// Move to the previous card
    Prev,
    /// Star or unstar the current card
    Star,
    /// Mark the current card learned
    Learn,
    /// Take the learned mark off the current card
    Unlearn,
    /// Jump to a random card not yet learned
    Random,
    /// Clear stars, learned marks and position, and reshuffle
    Reset,
}

#[derive(Subcommand)]
enum Command {
    /// List all sets
    List,

    /// Show the cards of a set
    Show {
        /// Set id or name (case-insensitive prefix match)
        set: String,
    },

    /// Create a set from a CSV file
    New {
        /// Name of the new set
        name: String,
        /// CSV file with word, definition and optional example columns
        csv: PathBuf,
        /// The first row is data, not a header
        #[arg(long)]
        no_header: bool,
    },

    /// Import a CSV file into an existing set
    Import {
        /// Set id or name
        set: String,
        /// CSV file with word, definition and optional example columns
        csv: PathBuf,
        /// The first row is data, not a header
        #[arg(long)]
        no_header: bool,
        /// How to treat words already in the set (default: from config)
        #[arg(long)]
        policy: Option<PolicyArg>,
    },

    /// Rename a set
    Rename {
        /// Set id or name
        set: String,
        /// New name
        name: String,
    },

    /// Delete a set and its study progress
    Delete {
        /// Set id or name
        set: String,
    },

    /// Step through a set in shuffled order
    Study {
        /// Set id or name
        set: String,
        /// Study only starred cards
        #[arg(long)]
        starred: bool,
        /// What to do
        #[arg(default_value = "current")]
        action: StudyAction,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::List => {
            commands::list::run(&app, &cli.format, use_color)?;
        }
        Command::Show { set } => {
            commands::show::run(&app, &set, &cli.format, use_color)?;
        }
        Command::New { name, csv, no_header } => {
            commands::new::run(&app, &name, &csv, !no_header, &cli.format)?;
        }
        Command::Import { set, csv, no_header, policy } => {
            let policy = policy.map(MergePolicy::from).unwrap_or(app.config.merge_policy);
            commands::import::run(&app, &set, &csv, !no_header, policy, &cli.format)?;
        }
        Command::Rename { set, name } => {
            commands::rename::run(&app, &set, &name, &cli.format)?;
        }
        Command::Delete { set } => {
            commands::delete::run(&app, &set, &cli.format)?;
        }
        Command::Study { set, starred, action } => {
            commands::study::run(&app, &set, starred, action, &cli.format, use_color)?;
        }
    }

    Ok(())
}

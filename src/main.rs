use clap::{Parser, Subcommand};
use sortdir::cli::{OrganizeCommand, run_cli_with_config};
use sortdir::output::OutputFormatter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Sort a folder's files into category subfolders", long_about = None)]
struct Cli {
    /// Log every move and failure to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Filter configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move each file of FOLDER into Images/, Documents/, ... by extension
    Organize {
        folder: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Don't draw a progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// Show where each file would go without moving anything
    Preview {
        folder: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List the categories and their extensions
    Categories,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match cli.command {
        Commands::Organize {
            folder,
            json,
            no_progress,
        } => OrganizeCommand::Organize {
            path: folder,
            json,
            progress: !no_progress,
        },
        Commands::Preview { folder, json } => OrganizeCommand::Preview { path: folder, json },
        Commands::Categories => OrganizeCommand::Categories,
    };

    match run_cli_with_config(command, cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}

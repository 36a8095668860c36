use crate::demo::{run_demo, run_match, run_tracks, DemoArgs, MatchArgs, TracksArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uni_finder::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "University Program Finder",
    about = "Match student profiles to university program offerings from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank a catalog of offerings for a profile stored as JSON
    Match(MatchArgs),
    /// Print the subject-group rule table
    Tracks(TracksArgs),
    /// Run an end-to-end demo over built-in sample offerings
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Offering catalog (.csv or .json) served by the matcher
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args),
        Command::Tracks(args) => run_tracks(args),
        Command::Demo(args) => run_demo(args),
    }
}

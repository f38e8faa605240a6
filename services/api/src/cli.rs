use crate::commands::{run_analyze, run_profiles, AnalyzeArgs, ProfilesCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use content_guard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Content Guard",
    about = "Assess books and movies for children and manage child profiles",
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
    /// Assess a single title and print the result
    Analyze(AnalyzeArgs),
    /// Manage stored child profiles
    Profiles {
        #[command(subcommand)]
        command: ProfilesCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Profiles { command } => run_profiles(command),
    }
}

use crate::commands::{run_search, run_show, SearchArgs, ShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use trainer_review::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Trainer Review",
    about = "Review trainer applicants from the command line or over HTTP",
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
    /// Filter an applicant CSV export with the search box syntax
    Search(SearchArgs),
    /// Print every field of one applicant from a CSV export
    Show(ShowArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Applicant CSV export used to seed the in-memory store
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
    /// E-mail of the operator allowed to sign in
    #[arg(long, requires = "admin_password")]
    pub(crate) admin_email: Option<String>,
    /// Password of the operator allowed to sign in
    #[arg(long, requires = "admin_email")]
    pub(crate) admin_password: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Search(args) => run_search(args),
        Command::Show(args) => run_show(args),
    }
}

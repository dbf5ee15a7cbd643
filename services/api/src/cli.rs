use crate::batch::{run_process, ProcessArgs};
use crate::report::{run_query, run_reset, QueryCommand, ResetArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_qa::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Lead QA",
    about = "Screen inbound leads and report on stored decisions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the read-only reporting HTTP service (default command)
    Serve(ServeArgs),
    /// Screen a batch of leads and persist the decisions
    Process(ProcessArgs),
    /// Query stored decisions
    Query {
        #[command(subcommand)]
        command: QueryCommand,
    },
    /// Delete every stored decision
    Reset(ResetArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured result database
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Process(args) => run_process(args),
        Command::Query { command } => run_query(command),
        Command::Reset(args) => run_reset(args),
    }
}

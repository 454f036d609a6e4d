use crate::demo::{run_clinic_directory, run_demo, ClinicsArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use donor_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Donor Match Service",
    about = "Run and demonstrate the blood donation matching service from the command line",
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
    /// Print the blood bank directory, nearest-first for a given location
    Clinics(ClinicsArgs),
    /// Run an end-to-end CLI demo covering the request and response workflows
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Clinics(args) => run_clinic_directory(args),
        Command::Demo(args) => run_demo(args),
    }
}

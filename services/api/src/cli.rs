use crate::demo::{run_demo, run_schedule_overview, DemoArgs, ScheduleOverviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use parent_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Parent Portal",
    about = "Run and demonstrate the parent portal lesson-rescheduling service",
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
    /// Inspect a student's schedule from the command line
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// Run an end-to-end CLI demo covering evaluation, makeup slots, and
    /// request submission
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    /// Print the annotated schedule overview for a student
    Overview(ScheduleOverviewArgs),
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
        Command::Schedule {
            command: ScheduleCommand::Overview(args),
        } => run_schedule_overview(args),
        Command::Demo(args) => run_demo(args),
    }
}

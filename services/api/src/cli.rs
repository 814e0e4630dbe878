use crate::demo::{run_demo, run_notifications, run_report, DemoArgs, NotificationArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_compliance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet Compliance",
    about = "Score equipment, vehicle, vendor, and operator compliance from the command line",
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
    /// Print a fleet compliance report from a CSV export
    Report(ReportArgs),
    /// Inspect notification routing decisions
    Notifications {
        #[command(subcommand)]
        command: NotificationCommand,
    },
    /// Score a built-in sample fleet end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum NotificationCommand {
    /// Show which channels a single preference routes to
    Resolve(NotificationArgs),
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
        Command::Report(args) => run_report(args),
        Command::Notifications {
            command: NotificationCommand::Resolve(args),
        } => run_notifications(args),
        Command::Demo(args) => run_demo(args),
    }
}

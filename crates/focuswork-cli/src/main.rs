use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod notifier;

#[derive(Parser)]
#[command(name = "focuswork", version, about = "Focus/break timer and time tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pomodoro session in the foreground
    Pomodoro(commands::pomodoro::PomodoroArgs),
    /// Track time on a task and print the committed entry
    Track(commands::track::TrackArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Format a duration given in seconds
    Format {
        #[command(subcommand)]
        action: commands::format::FormatAction,
    },
}

fn main() {
    // Logs go to stderr; stdout carries JSON only.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Pomodoro(args) => block_on(commands::pomodoro::run(args)),
        Commands::Track(args) => block_on(commands::track::run(args)),
        Commands::Config { action } => commands::config::run(action),
        Commands::Format { action } => commands::format::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn block_on<F>(fut: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: std::future::Future<Output = Result<(), Box<dyn std::error::Error>>>,
{
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(fut)
}

use clap::{CommandFactory, Parser, Subcommand};
use studydesk_core::Config;

mod commands;
mod logging;

use commands::Output;

#[derive(Parser)]
#[command(name = "studydesk", version, about = "Studydesk: tasks, calendar and pomodoro for students")]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task board
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Calendar events
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Pomodoro timer and daily goal
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Video links and study tips
    Resource {
        #[command(subcommand)]
        action: commands::resource::ResourceAction,
    },
    /// Weekly class schedule
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Today's summary
    Dashboard,
    /// Backup and restore
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load();
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    logging::init(&level);
    let config = config.unwrap_or_else(|e| {
        tracing::warn!("falling back to default config: {e}");
        Config::default()
    });

    let out = Output { json: cli.json };
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action, out),
        Commands::Event { action } => commands::event::run(action, out),
        Commands::Timer { action } => commands::timer::run(action, out, &config),
        Commands::Resource { action } => commands::resource::run(action, out),
        Commands::Schedule { action } => commands::schedule::run(action, out),
        Commands::Dashboard => commands::dashboard::run(out, &config),
        Commands::Data { action } => commands::data::run(action, out),
        Commands::Config { action } => commands::config::run(action, out),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

//! galasactl - launches Galasa test runs in a local JVM.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "galasactl")]
#[command(about = "Galasa CLI - run tests in a local JVM")]
#[command(version)]
struct Cli {
    /// Log level filter, for example "info" or "jvm_launcher=debug"
    #[arg(short, long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with test runs
    Runs {
        #[command(subcommand)]
        command: RunsCommands,
    },

    /// Work with the Galasa home folder
    Home {
        #[command(subcommand)]
        command: HomeCommands,
    },
}

#[derive(Subcommand)]
enum RunsCommands {
    /// Submit test runs
    Submit {
        #[command(subcommand)]
        command: SubmitCommands,
    },

    /// Clean up leftover test resources
    Cleanup {
        #[command(subcommand)]
        command: CleanupCommands,
    },
}

#[derive(Subcommand)]
enum SubmitCommands {
    /// Run a test in a JVM on this machine
    Local(commands::submit_local::SubmitLocalArgs),
}

#[derive(Subcommand)]
enum CleanupCommands {
    /// Run resource cleanup in a JVM on this machine
    Local(commands::cleanup_local::CleanupLocalArgs),
}

#[derive(Subcommand)]
enum HomeCommands {
    /// Create the Galasa home folder skeleton
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cli.log))
        .with_target(false)
        .init();

    smol::block_on(async {
        match cli.command {
            Commands::Runs { command } => match command {
                RunsCommands::Submit { command } => match command {
                    SubmitCommands::Local(args) => commands::submit_local::run(args).await,
                },
                RunsCommands::Cleanup { command } => match command {
                    CleanupCommands::Local(args) => commands::cleanup_local::run(args).await,
                },
            },
            Commands::Home { command } => match command {
                HomeCommands::Init => commands::home_init::run().await,
            },
        }
    })
}

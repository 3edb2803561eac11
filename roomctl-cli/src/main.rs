mod commands;
mod tracing_setup;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use roomctl_core::{config::load_dotenv, AppConfig};

use commands::db::DbArgs;
use commands::serve::ServeArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "roomctl",
    author,
    version,
    about = "Conference room booking backend: HTTP API and database scripts",
    long_about = "Run the conference room booking API and manage its PostgreSQL database: \
                  create, drop, back up, restore, migrate and seed."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Database administration, migrations and seeds
    Db(DbArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug }).ok();
    // After the subscriber so the load is logged; RUST_LOG is read from the
    // process environment only
    load_dotenv();

    match cli.command {
        Commands::Completions(args) => run_completions(args),
        Commands::Serve(args) => {
            let config = load_config()?;
            commands::run_serve(args, &config).await
        }
        Commands::Db(args) => {
            let config = load_config()?;
            commands::run_db(args, &config).await
        }
    }
}

fn load_config() -> Result<AppConfig> {
    AppConfig::from_env().context("Invalid configuration")
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

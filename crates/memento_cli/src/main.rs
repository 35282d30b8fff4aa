//! Memento CLI - GitHub repository dashboard for MementoAI.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use memento::dashboard::SortKey;
use memento::theme::ThemePreference;

#[derive(Parser)]
#[command(name = "memento")]
#[command(version)]
#[command(about = "A GitHub repository dashboard")]
#[command(
    long_about = "Memento signs in to GitHub, fetches every repository the authenticated \
user owns or collaborates on, and renders a filterable, sortable dashboard of \
them. It can also serve the same data as a small HTTP API."
)]
#[command(after_long_help = r#"EXAMPLES
    Sign in to GitHub:
        $ memento login

    List your repositories, most recently updated first:
        $ memento repos

    Search and narrow to a language, sorted by stars:
        $ memento repos --search agent --language Rust --sort stars

    Serve the dashboard API on the default port:
        $ memento serve

    Generate shell completions:
        $ memento completions bash > ~/.local/share/bash-completion/completions/memento

CONFIGURATION
    Memento reads configuration from:
      1. ~/.config/memento/config.toml (or $XDG_CONFIG_HOME/memento/config.toml)
      2. ./memento.toml in the current directory
      3. Environment variables (MEMENTO_* prefix, e.g., MEMENTO_GITHUB_TOKEN)
      4. .env file in the current directory

ENVIRONMENT VARIABLES
    MEMENTO_GITHUB_TOKEN      GitHub access token (alternative to `memento login`)
    MEMENTO_SERVER_BIND       Bind address for `memento serve` (default: 127.0.0.1)
    MEMENTO_SERVER_PORT       Port for `memento serve` (default: 8787)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with GitHub using OAuth Device Flow
    ///
    /// Opens your browser to authorize Memento with GitHub.
    /// The token is saved to your config file for future use.
    Login,
    /// List your repositories with the dashboard filters
    Repos(ReposArgs),
    /// Serve the dashboard HTTP API
    Serve(ServeArgs),
    /// Show or change the persisted theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Filters and presentation options for the repository listing.
#[derive(Debug, Clone, clap::Args)]
struct ReposArgs {
    /// Match repositories whose name or description contains this text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Only show repositories with this primary language (exact match)
    #[arg(short, long)]
    language: Option<String>,

    /// Sort order: updated, stars, or name (default from config or updated)
    #[arg(short = 'S', long)]
    sort: Option<SortKey>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = commands::repos::OutputFormat::Table)]
    output: commands::repos::OutputFormat,
}

/// Options for the dashboard API server.
#[derive(Debug, Clone, clap::Args)]
struct ServeArgs {
    /// Bind address (default from config or 127.0.0.1)
    #[arg(short, long)]
    bind: Option<String>,

    /// Port (default from config or 8787)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Debug, Clone, Subcommand)]
enum ThemeAction {
    /// Show the persisted theme preference
    Get,
    /// Persist a new theme preference
    Set {
        /// light, dark, or system
        preference: ThemePreference,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Structured logging for non-TTY runs; the server always logs.
    if matches!(cli.command, Commands::Serve(_)) || !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("memento=info,memento_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    match cli.command {
        Commands::Login => commands::login::handle_login().await?,
        Commands::Repos(args) => commands::repos::handle_repos(args, &config).await?,
        Commands::Serve(args) => commands::serve::handle_serve(args, &config).await?,
        Commands::Theme { action } => commands::theme::handle_theme(action)?,
        Commands::Completions { shell } => commands::meta::handle_completions(shell)?,
    }

    Ok(())
}

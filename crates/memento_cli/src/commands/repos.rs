use chrono::Utc;
use clap::ValueEnum;
use console::Term;
use tabled::Table;
use tabled::settings::Style;

use memento::dashboard::{Dashboard, ListOutcome, RepoQuery, format_relative};
use memento::github::{GitHubClient, RepoLister};
use memento::record::RepoRecord;

use crate::ReposArgs;
use crate::config::Config;

/// Output format for the repository listing.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// One row of the repository table.
#[derive(Debug, tabled::Tabled)]
struct RepoRow {
    #[tabled(rename = "Repository")]
    name: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Stars")]
    stars: u64,
    #[tabled(rename = "Issues")]
    issues: u64,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

impl RepoRow {
    fn from_record(record: &RepoRecord, now: chrono::DateTime<Utc>) -> Self {
        let mut flags = Vec::new();
        if record.private {
            flags.push("private");
        }
        if record.fork {
            flags.push("fork");
        }

        Self {
            name: record.full_name.clone(),
            language: record.language.clone().unwrap_or_default(),
            stars: record.stargazers_count,
            issues: record.open_issues_count,
            updated: format_relative(record.updated_at, now),
            flags: flags.join(", "),
        }
    }
}

/// Fetch the repository list and render it through the dashboard filters.
pub(crate) async fn handle_repos(
    args: ReposArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = config.github_token().ok_or(
        "No GitHub token configured. Run 'memento login' to authenticate, \
         or set MEMENTO_GITHUB_TOKEN.",
    )?;
    let client = GitHubClient::new(&token)?;

    let query = RepoQuery {
        search: args.search.clone(),
        language: args.language.clone(),
        sort: args.sort.unwrap_or_else(|| config.default_sort()),
    };

    let mut dashboard = Dashboard::new(query);
    dashboard.begin_refresh();

    // A CLI run has no previously loaded data to fall back on, so fetch
    // failures surface directly instead of through the dashboard.
    let records = client.list_repositories().await?;
    dashboard.finish_refresh(Ok::<_, String>(records));

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dashboard.view())?);
        }
        OutputFormat::Table => print_table(&dashboard),
    }

    Ok(())
}

fn print_table(dashboard: &Dashboard) {
    let is_tty = Term::stdout().is_term();
    let stats = dashboard.stats();

    if is_tty {
        println!(
            "{} repositories · {} languages · {} stars · {} original\n",
            stats.total_repos, stats.languages, stats.total_stars, stats.original_repos
        );
    } else {
        tracing::info!(
            total = stats.total_repos,
            languages = stats.languages,
            stars = stats.total_stars,
            original = stats.original_repos,
            "repository stats"
        );
    }

    match dashboard.outcome() {
        ListOutcome::NoRepositories => {
            println!("It looks like you don't have any repositories yet.");
        }
        ListOutcome::NoMatches => {
            println!("No repositories match the current filter.");
            println!("Try adjusting your search or filter criteria.");
        }
        ListOutcome::Matches(_) => {
            let now = Utc::now();
            let rows: Vec<RepoRow> = dashboard
                .view()
                .iter()
                .map(|r| RepoRow::from_record(r, now))
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::sharp());
            println!("{table}");
        }
    }
}

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use buildlens::api::ApiClient;
use buildlens::auth::Token;
use buildlens::builds::{BuildAggregateBuilder, BuildFetchOrchestrator, BuildFilter, FetchOutcome};
use buildlens::config::{Config, OutputFormat};
use buildlens::output::{export_json, print_summary, FeedReport, PageProgress};
use buildlens::providers::enrichment::ProfileLookup;
use buildlens::providers::github::GitHubClient;

#[derive(Parser)]
#[command(name = "buildlens")]
#[command(author, version, about = "CI Build Feed", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write the JSON feed to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Configuration file (defaults to ./buildlens.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and normalize builds page by page
    Builds(BuildsArgs),
    /// Write a configuration file with the default settings
    Init(InitArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Destination; the extension picks TOML, JSON or YAML
    #[arg(long, default_value = "buildlens.toml")]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct BuildsArgs {
    /// Builds API root
    #[arg(short = 'u', long, env = "BUILDLENS_API_URL")]
    api_url: Option<String>,

    #[arg(short, long, env = "BUILDLENS_TOKEN")]
    token: Option<String>,

    /// Builds per page
    #[arg(short, long)]
    limit: Option<usize>,

    #[arg(short, long, value_enum)]
    filter: Option<BuildFilter>,

    /// User whose builds are listed
    #[arg(long)]
    user_id: Option<u64>,

    /// Number of pages to fetch
    #[arg(short = 'n', long, default_value_t = 1)]
    pages: usize,

    /// Keep fetching until the last page
    #[arg(long, conflicts_with = "pages")]
    all: bool,

    #[arg(long)]
    github_url: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN")]
    github_token: Option<String>,

    /// Skip GitHub profile lookups
    #[arg(long)]
    no_enrich: bool,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

impl Cli {
    async fn execute_builds(&self, args: &BuildsArgs) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        let api_url = args.api_url.as_deref().unwrap_or(&config.api.base_url);
        let api_token = args.token.as_ref().or(config.api.token.as_ref());
        let page_size = args.limit.unwrap_or(config.api.page_size);
        let filter = args.filter.unwrap_or(config.api.filter);
        let user_id = args.user_id.unwrap_or(config.api.user_id);
        let format = args.format.unwrap_or(config.output.format);
        let pretty = self.pretty || config.output.pretty;

        info!("Collecting {} builds from {api_url}", filter.as_str());

        let source = ApiClient::new(api_url, api_token.map(|t| Token::from(t.as_str())))
            .context("Failed to configure builds API client")?;

        let lookup: Option<Arc<dyn ProfileLookup>> = if args.no_enrich || !config.github.enrich {
            debug!("GitHub enrichment disabled");
            None
        } else {
            let github_url = args.github_url.as_deref().unwrap_or(&config.github.base_url);
            let github_token = args
                .github_token
                .as_ref()
                .or(config.github.token.as_ref())
                .map(|t| Token::from(t.as_str()));
            let client: Arc<dyn ProfileLookup> = Arc::new(
                GitHubClient::new(github_url, github_token)
                    .context("Failed to configure GitHub client")?,
            );
            Some(client)
        };

        let feed = BuildFetchOrchestrator::new(
            source,
            BuildAggregateBuilder::new(lookup),
            page_size,
            filter,
            user_id,
        )?;

        let mut failures = Vec::new();
        let mut page = 1;

        while args.all || page <= args.pages {
            let progress = PageProgress::start(page, feed.offset().await);

            let outcome = match feed.fetch_next_page().await {
                Ok(outcome) => outcome,
                Err(e) => {
                    progress.fail();
                    return Err(e).with_context(|| format!("Failed to fetch builds page {page}"));
                }
            };

            let FetchOutcome::Fetched(report) = outcome else {
                progress.finish(0, 0);
                break;
            };

            progress.finish(report.appended, report.failures.len());
            failures.extend(report.failures);

            if !report.has_more {
                break;
            }
            page += 1;
        }

        let snapshot = feed.snapshot().await;

        if let Some(output_path) = &self.output {
            let mut file = File::create(output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?;
            export_json(&FeedReport::new(&snapshot, &failures), pretty, &mut file)?;
            info!("Feed written to: {}", output_path.display());
        }

        match format {
            OutputFormat::Summary => print_summary(&snapshot, &failures),
            OutputFormat::Json if self.output.is_none() => {
                export_json(
                    &FeedReport::new(&snapshot, &failures),
                    pretty,
                    &mut std::io::stdout(),
                )?;
            }
            OutputFormat::Json => {}
        }

        Ok(())
    }

    fn execute_init(&self, args: &InitArgs) -> Result<()> {
        if args.path.exists() && !args.force {
            anyhow::bail!(
                "{} already exists, pass --force to overwrite it",
                args.path.display()
            );
        }

        Config::default().save(&args.path)?;
        info!("Configuration written to: {}", args.path.display());
        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Builds(args) => self.execute_builds(args).await,
            Commands::Init(args) => self.execute_init(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_command() {
        let cli = Cli::try_parse_from([
            "buildlens",
            "builds",
            "--api-url",
            "http://ci.local/api",
            "--limit",
            "10",
            "--filter",
            "commits",
            "--user-id",
            "3",
            "--no-enrich",
            "--format",
            "json",
            "--pretty",
        ])
        .unwrap();

        assert!(cli.pretty);
        let Commands::Builds(args) = cli.command else {
            panic!("expected the builds command");
        };
        assert_eq!(args.api_url.as_deref(), Some("http://ci.local/api"));
        assert_eq!(args.limit, Some(10));
        assert_eq!(args.filter, Some(BuildFilter::Commits));
        assert_eq!(args.user_id, Some(3));
        assert_eq!(args.pages, 1);
        assert!(args.no_enrich);
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("buildlens.yaml");
        let path_arg = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["buildlens", "init", "--path", path_arg]).unwrap();
        cli.execute().await.unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:6500/api");
        assert_eq!(config.api.page_size, 5);
        assert!(config.github.enrich);

        // A second run refuses to clobber the file unless forced.
        assert!(cli.execute().await.is_err());
        let forced =
            Cli::try_parse_from(["buildlens", "init", "--path", path_arg, "--force"]).unwrap();
        forced.execute().await.unwrap();
    }

    #[test]
    fn test_all_conflicts_with_pages() {
        let result = Cli::try_parse_from(["buildlens", "builds", "--all", "--pages", "3"]);
        assert!(result.is_err());
    }
}

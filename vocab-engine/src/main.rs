//! vocab - controlled vocabulary toolbox
//!
//! Lists the registered vocabulary sources, writes their vocabulary
//! records, downloads their data files and looks up terms.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vocab_common::config::load_toml_config;
use vocab_engine::config::Overrides;
use vocab_engine::{AppState, Settings, TermSource};

const MEGABYTE: f64 = 1024.0 * 1024.0;

/// Command-line arguments for vocab
#[derive(Parser, Debug)]
#[command(name = "vocab")]
#[command(about = "Controlled vocabularies toolbox")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for downloaded vocabulary files
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Limit the action to these vocabulary prefixes (comma separated)
    #[arg(short = 'f', long = "prefixes", global = true, value_delimiter = ',')]
    prefixes: Vec<String>,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered vocabulary sources
    Managers,
    /// Write vocabulary records from the registered sources
    Update,
    /// Download missing source data files
    Fetch,
    /// Download source data files, replacing existing ones
    Refetch,
    /// Update, then fetch
    Init,
    /// Search the sources directly, bypassing the database
    Search {
        /// Plain string to look up
        #[arg(short, long)]
        pattern: String,
    },
    /// Resolve a pattern to a stored term, caching new terms
    Resolve {
        /// Plain string to look up
        #[arg(short, long)]
        pattern: String,

        /// Require the label or termid to equal the pattern
        #[arg(long)]
        exact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let toml_config = load_toml_config(args.config.as_deref()).context("Failed to load config")?;
    let overrides = Overrides {
        data_root: args.data_root.as_deref(),
        database: args.database.as_deref(),
    };
    let settings = Settings::resolve(&overrides, &toml_config);

    let default_level = if args.quiet { "warn" } else { settings.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting vocab v{} ({} from {}, {} build)",
        env!("CARGO_PKG_VERSION"),
        env!("VOCAB_COMMIT"),
        env!("VOCAB_COMMIT_DATE"),
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );
    info!("Data root: {}", settings.data_root.display());

    let state = AppState::bootstrap(settings).await?;
    let cli = Cli {
        state,
        prefixes: args.prefixes,
        quiet: args.quiet,
    };

    let ok = match args.command {
        Command::Managers => {
            cli.managers();
            true
        }
        Command::Update => cli.update().await?,
        Command::Fetch => cli.fetch(false).await?,
        Command::Refetch => cli.fetch(true).await?,
        Command::Init => cli.update().await? && cli.fetch(false).await?,
        Command::Search { pattern } => cli.search(&pattern).await?,
        Command::Resolve { pattern, exact } => cli.resolve(&pattern, exact).await?,
    };

    if ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

struct Cli {
    state: AppState,
    prefixes: Vec<String>,
    quiet: bool,
}

impl Cli {
    fn selected(&self) -> Vec<Arc<dyn TermSource>> {
        self.state.registry.select(self.prefixes.as_slice())
    }

    fn say(&self, line: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", line.as_ref());
        }
    }

    fn managers(&self) {
        println!("{:12.12} {:30.30} {:5.5} {}", "prefix", "concept", "kind", "label");
        for source in self.selected() {
            let metadata = source.metadata();
            println!(
                "{:12.12} {:30.30} {:5.5} {}",
                metadata.prefix,
                metadata.concept,
                source.kind().to_string(),
                metadata.label
            );
        }
    }

    async fn update(&self) -> Result<bool> {
        let vocabularies = self
            .state
            .registry
            .sync_vocabulary_records(&self.state.db)
            .await?;

        for vocabulary in vocabularies {
            self.say(&vocabulary.prefix);
        }

        Ok(true)
    }

    /// False when any download failed; every selected source is still attempted
    async fn fetch(&self, overwrite: bool) -> Result<bool> {
        let mut ok = true;

        for source in self.selected() {
            let report = match source.download(overwrite).await {
                Ok(Some(report)) => report,
                Ok(None) => continue,
                Err(e) => {
                    error!(prefix = %source.prefix(), error = %e, "Vocabulary fetch failed");
                    println!("ERROR: {}: {}", source.prefix(), e);
                    ok = false;
                    continue;
                }
            };

            self.say(source.prefix());
            if report.size > 0 {
                self.say(format!(
                    "\t{}\n\t{}\n\t{:.3}MB",
                    report.url,
                    report.path.display(),
                    report.size as f64 / MEGABYTE
                ));
            } else {
                println!("ERROR: vocabulary download failed {}", report.url);
                ok = false;
            }
        }

        Ok(ok)
    }

    async fn search(&self, pattern: &str) -> Result<bool> {
        let pattern = pattern.trim();
        if self.prefixes.is_empty() || pattern.is_empty() {
            println!("Please use -f and -p to pass a vocabulary prefix and a pattern");
            return Ok(false);
        }

        let mut ok = true;
        for prefix in &self.prefixes {
            let Some(source) = self.state.registry.get(prefix) else {
                println!("{}: source not found", prefix);
                ok = false;
                continue;
            };

            match source.search(pattern).await {
                Ok(terms) => {
                    let wire: Vec<Vec<&str>> = terms.iter().map(|t| t.wire()).collect();
                    println!("{}: {} source", prefix, source.kind());
                    println!("{}", serde_json::to_string(&wire)?);
                }
                Err(e) => {
                    println!("ERROR: {}: {}", prefix, e);
                    ok = false;
                }
            }
        }

        Ok(ok)
    }

    async fn resolve(&self, pattern: &str, exact: bool) -> Result<bool> {
        let resolver = self.state.resolver();
        let local_base_url = &self.state.settings.local_base_url;
        let mut ok = true;

        for source in self.selected() {
            let prefix = source.prefix();
            match resolver.search_term_or_none(Some(prefix), Some(pattern), exact).await {
                Ok(Some(term)) => {
                    let url = match vocab_common::db::get_vocabulary_by_prefix(&self.state.db, prefix).await? {
                        Some(vocabulary) => term.absolute_url(&vocabulary, local_base_url),
                        None => String::new(),
                    };
                    println!("{}\t{}\t{}", term.absolute_id(), term.label, url);
                }
                Ok(None) => println!("{}: no match", prefix),
                Err(e) => {
                    println!("ERROR: {}: {}", prefix, e);
                    ok = false;
                }
            }
        }

        Ok(ok)
    }
}

//! # Script Research CLI (`research`)
//!
//! Runs the research pipeline over JSON files of source records.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `research merge` | Deduplicate and rank web sources and user documents |
//! | `research validate` | Check a corpus against a target duration |
//! | `research check` | Merge, then validate; exits 2 when inadequate |
//! | `research overlap` | Report overlapping sources within one corpus |
//! | `research requirements` | Print the duration → requirement table |
//! | `research serve` | Start the JSON HTTP server |
//! | `research completions <shell>` | Print shell completions |
//!
//! ## Examples
//!
//! ```bash
//! research merge --web web.json --docs docs.json --json > merged.json
//! research validate --input merged.json --duration 45
//! research check --web web.json --docs docs.json --duration 60
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see every duplicate decision.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;
use std::path::PathBuf;

use script_research::adequacy::{
    calculate_adequacy_percentage, detect_duplicate_content, validate_research_for_duration,
};
use script_research::config::{self, Config};
use script_research::input::{read_optional_sources, read_sources};
use script_research::merge::{merge_research_sources, MergeOptions};
use script_research::models::{Origin, Source};
use script_research::pipeline::assess;
use script_research::{report, server};

/// Script Research: merge and validate research for long-form scripts.
#[derive(Parser)]
#[command(
    name = "research",
    about = "Merge, deduplicate, and validate research for long-form script generation",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge web sources and user documents into one ranked corpus.
    Merge {
        /// JSON file of web-research source records.
        #[arg(long)]
        web: Option<PathBuf>,

        /// JSON file of user-document source records.
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Override `[merge].max_sources`.
        #[arg(long)]
        max_sources: Option<usize>,

        /// Skip duplicate removal.
        #[arg(long)]
        keep_duplicates: bool,

        /// Concatenate web sources ahead of documents before sorting.
        #[arg(long)]
        web_first: bool,

        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a corpus for a target script duration.
    Validate {
        /// JSON file of source records (e.g. the `sources` of a merge).
        #[arg(long)]
        input: PathBuf,

        /// Target duration in minutes. Defaults to `[validation].default_duration_minutes`.
        #[arg(long)]
        duration: Option<u32>,

        /// The caller supplied user documents.
        #[arg(long)]
        has_user_documents: bool,

        #[arg(long)]
        json: bool,
    },

    /// Merge, then validate. Exits with status 2 when research is inadequate.
    Check {
        #[arg(long)]
        web: Option<PathBuf>,

        #[arg(long)]
        docs: Option<PathBuf>,

        #[arg(long)]
        duration: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Report overlapping sources within a single corpus.
    Overlap {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Print the duration → requirement table.
    Requirements,

    /// Start the JSON HTTP server on `[server].bind`.
    Serve,

    /// Print shell completions.
    Completions {
        shell: Shell,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve_duration(requested: Option<u32>, cfg: &Config) -> Result<u32> {
    match requested {
        Some(0) => anyhow::bail!("--duration must be >= 1"),
        Some(minutes) => Ok(minutes),
        None => Ok(cfg.validation.default_duration_minutes),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "research", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Merge {
            web,
            docs,
            max_sources,
            keep_duplicates,
            web_first,
            json,
        } => {
            let web = read_optional_sources(web.as_deref())?;
            let docs = read_optional_sources(docs.as_deref())?;
            let defaults = cfg.merge.to_options();
            let options = MergeOptions {
                remove_duplicates: defaults.remove_duplicates && !keep_duplicates,
                prioritize_documents: defaults.prioritize_documents && !web_first,
                max_sources: max_sources.or(defaults.max_sources),
            };
            let result = merge_research_sources(&web, &docs, &options);
            if json {
                print_json(&result)?;
            } else {
                report::print_merge(&result);
            }
        }
        Commands::Validate {
            input,
            duration,
            has_user_documents,
            json,
        } => {
            let duration = resolve_duration(duration, &cfg)?;
            let sources: Vec<Source> = read_sources(&input)?
                .iter()
                .map(|r| Source::from_record(r, Origin::Web))
                .collect();
            let result = validate_research_for_duration(&sources, duration, has_user_documents);
            let percentage = calculate_adequacy_percentage(&result);
            if json {
                print_json(&serde_json::json!({
                    "validation": result,
                    "adequacy_percentage": percentage,
                }))?;
            } else {
                report::print_validation(&result, percentage);
            }
        }
        Commands::Check {
            web,
            docs,
            duration,
            json,
        } => {
            let duration = resolve_duration(duration, &cfg)?;
            let web = read_optional_sources(web.as_deref())?;
            let docs = read_optional_sources(docs.as_deref())?;
            let assessment = assess(&web, &docs, duration, &cfg.merge.to_options());
            if json {
                print_json(&assessment)?;
            } else {
                report::print_merge(&assessment.merge);
                println!();
                report::print_validation(&assessment.validation, assessment.adequacy_percentage);
            }
            if !assessment.is_adequate() {
                std::process::exit(2);
            }
        }
        Commands::Overlap { input, json } => {
            let sources: Vec<Source> = read_sources(&input)?
                .iter()
                .map(|r| Source::from_record(r, Origin::Web))
                .collect();
            let overlaps = detect_duplicate_content(&sources);
            if json {
                print_json(&overlaps)?;
            } else {
                report::print_overlaps(&overlaps);
            }
        }
        Commands::Requirements => {
            report::print_requirements();
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scraper::Html;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vacancy_fit::config::Config;
use vacancy_fit::fetch::PageFetcher;
use vacancy_fit::scoring::ChatClient;
use vacancy_fit::{assess, extract_text, fetch_and_extract, PageKind};

#[derive(Parser)]
#[command(name = "vacancy-fit", about = "Score how well a résumé fits a job posting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a job posting and print its summary
    Vacancy { url: String },
    /// Fetch a résumé and print its summary
    Resume { url: String },
    /// Extract a summary from a saved HTML file
    Parse {
        /// Page kind
        #[arg(short, long, value_enum)]
        kind: PageKind,
        path: PathBuf,
    },
    /// Fetch both pages and score the candidate against the vacancy
    Score {
        /// Job posting URL
        #[arg(long)]
        vacancy: String,
        /// Résumé URL
        #[arg(long)]
        resume: String,
        /// Also print the extracted summaries
        #[arg(long)]
        show_summaries: bool,
    },
}

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // stdout carries the rendered text only
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Vacancy { url } => {
            let fetcher = PageFetcher::new(&config.fetch_config());
            println!("{}", fetch_and_extract(&fetcher, PageKind::Vacancy, &url)?);
        }
        Commands::Resume { url } => {
            let fetcher = PageFetcher::new(&config.fetch_config());
            println!("{}", fetch_and_extract(&fetcher, PageKind::Resume, &url)?);
        }
        Commands::Parse { kind, path } => {
            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            println!("{}", extract_text(kind, &Html::parse_document(&html)));
        }
        Commands::Score {
            vacancy,
            resume,
            show_summaries,
        } => {
            let fetcher = PageFetcher::new(&config.fetch_config());
            let scorer = ChatClient::new(config.chat_config()?);
            info!(model = scorer.model(), "scoring candidate");

            let assessment = assess(&fetcher, &scorer, &vacancy, &resume)?;
            if show_summaries {
                println!("{}\n\n{}\n\n---\n", assessment.vacancy_text, assessment.resume_text);
            }
            println!("{}", assessment.verdict);
        }
    }

    Ok(())
}

//! # Newsripper
//!
//! Command-line front end for the article ripper. Articles are kept in a
//! JSON store, by default `./articles.json`.
//!
//! ## Usage
//!
//! ```sh
//! newsripper rip https://www.politico.com/news/2020/03/03/story
//! newsripper list
//! RUST_LOG=debug newsripper --store /srv/news.json show https://www.politico.com/news/2020/03/03/story
//! ```

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};
use newsripper::{ArticleStore, RipError, Ripper};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(store = %args.store, command = ?args.command, "Parsed CLI arguments");

    let mut store = ArticleStore::open(&args.store).await?;
    let ripper = Ripper::new()?;

    match args.command {
        Command::Rip { url } => match store.process_article_from_url(&ripper, &url).await {
            Ok((article, true)) => {
                info!(id = ?article.id, "Article ripped successfully.");
                println!("{article}");
                if let Some(summary) = article.summary_part() {
                    println!("{summary}");
                }
            }
            Ok((article, false)) => {
                warn!(
                    rip_time = %article.rip_time,
                    "Article already exists, ripped at {}. No new processing performed.",
                    article.rip_time
                );
                println!("{article}");
            }
            Err(e) => return Err(report(e)),
        },
        Command::Reprocess { url } => match store.reprocess(&ripper, &url).await {
            Ok(article) => {
                info!(id = ?article.id, "Article re-processed successfully.");
                println!("{article}");
            }
            Err(e) => return Err(report(e)),
        },
        Command::Show { url } => {
            let article = store.get_by_url(&url).map_err(report)?;
            println!("{}", serde_json::to_string_pretty(article)?);
        }
        Command::Delete { url } => {
            let article = store.delete_by_url(&url).map_err(report)?;
            store.save().await?;
            info!(id = ?article.id, url = %article.url, "Deleted article");
        }
        Command::List => {
            for article in store.articles() {
                println!(
                    "{:>5}  {}  {}  {}",
                    article.id.map(|id| id.to_string()).unwrap_or_default(),
                    article.rip_time.format("%Y-%m-%d %H:%M"),
                    article,
                    article.url
                );
            }
        }
    }

    Ok(())
}

/// Log a failed command the way a user needs to read it.
fn report(e: RipError) -> Box<dyn Error> {
    match &e {
        RipError::InvalidUrl(url) => error!(%url, "Invalid URL; nothing was ripped"),
        RipError::NotFound(url) => error!(%url, "No stored article for this URL"),
        RipError::StructureNotFound { extractor, element } => error!(
            extractor,
            element, "Page layout not recognized; the article was not saved"
        ),
        other => error!(error = %other, "Command failed"),
    }
    Box::new(e)
}

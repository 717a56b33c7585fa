//! Command-line interface definitions for Newsripper.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. The store location can also be given through the environment.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Newsripper application.
///
/// # Examples
///
/// ```sh
/// # Rip a new article into ./articles.json
/// newsripper rip https://www.cnn.com/2020/03/03/politics/story/index.html
///
/// # Rip it again, overwriting the stored fields
/// newsripper --store /srv/news/articles.json reprocess https://www.cnn.com/2020/03/03/politics/story/index.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON article store
    #[arg(short, long, env = "NEWSRIPPER_STORE", default_value = "articles.json")]
    pub store: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rip a news article from its URL
    Rip { url: String },
    /// Rip a stored article again and overwrite its contents
    Reprocess { url: String },
    /// Print a stored article
    Show { url: String },
    /// Delete a stored article
    Delete { url: String },
    /// List stored articles, newest first
    List,
}

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jobwatch")]
#[command(about = "Watches job-board feeds and emails a digest of matching postings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check all feeds once and email the digest
    Run {
        /// Dry run - print the digest instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// With --dry-run, print the matches as JSON
        #[arg(long, requires = "dry_run")]
        json: bool,
    },

    /// Run now, then again at every scheduled time of day (UTC)
    Schedule {
        /// Wait for the first scheduled time instead of running immediately
        #[arg(long)]
        skip_initial: bool,
    },

    /// List the configured feeds
    Feeds,

    /// Test the keyword filter against a piece of text
    Check {
        /// Text to evaluate, e.g. a posting title
        text: String,
    },
}

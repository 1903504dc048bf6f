// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is described with Rust
// structs and attributes, and clap generates the parsing code.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "crawl-guardian",
    version = "0.1.0",
    about = "Verify that a website stays healthy and search-engine crawlable",
    long_about = "crawl-guardian fetches a site's sitemap.xml, checks every listed URL for \
                  bad statuses and accidental noindex directives, and samples internal links \
                  on key pages for 404s. Designed for CI/CD and scheduled health checks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

// The subcommands the user can run
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full verification against a site config
    ///
    /// Example: crawl-guardian check site.json --json
    Check {
        /// Path to the site config JSON file
        config: PathBuf,

        /// Output the report in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Override the configured batch size
        #[arg(long)]
        batch_size: Option<usize>,

        /// Override the configured per-request timeout (seconds)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Fetch a site's sitemap and print the listed URLs
    ///
    /// Example: crawl-guardian sitemap https://www.example.com --seo-only
    Sitemap {
        /// Site origin, e.g. https://www.example.com
        origin: String,

        /// Print only SEO-relevant URLs (skip queries, .xml/.pdf, utility pages)
        #[arg(long)]
        seo_only: bool,
    },
}

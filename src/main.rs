// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the appropriate subcommand handler
// 3. Run the verification engine and print its report
// 4. Exit with proper code (0 = pass, 1 = violations found, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker;       // src/checker/ - per-URL checking logic
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config/ - site config and exception registry
mod engine;        // src/engine/ - full verification run
mod report;        // src/report/ - violation aggregation
mod sitemap;       // src/sitemap/ - sitemap fetch and parse

use clap::Parser;
use cli::{Cli, Commands};

use anyhow::Result;

#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // A fatal error: no sitemap, unreadable config, and the like
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = all checks passed
//   Ok(1) = violations found
//   Err   = the run could not be performed at all
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            config,
            json,
            batch_size,
            timeout_secs,
        } => {
            let mut site_config = config::load_config(&config)?;
            if let Some(batch_size) = batch_size {
                site_config.batch_size = batch_size;
            }
            if let Some(timeout_secs) = timeout_secs {
                site_config.timeout_secs = timeout_secs;
            }
            handle_check(&site_config, json).await
        }
        Commands::Sitemap { origin, seo_only } => handle_sitemap(&origin, seo_only).await,
    }
}

// Handles the 'check' subcommand: the full verification run
async fn handle_check(config: &config::SiteConfig, json: bool) -> Result<i32> {
    println!("🔍 Verifying site health: {}", config.origin);
    println!(
        "📊 batch size {}, timeout {}s, link sample cap {}",
        config.batch_size, config.timeout_secs, config.link_sample_cap
    );

    let report = engine::verify_site(config).await?;

    print_report(&report, json)?;

    if report.is_passing() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Handles the 'sitemap' subcommand: fetch and list sitemap URLs
//
// Handy for building the config's exception sets and key-page list.
async fn handle_sitemap(origin: &str, seo_only: bool) -> Result<i32> {
    let origin = origin.trim_end_matches('/');

    // A stalled sitemap endpoint must fail the command, not hang it
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let xml = sitemap::fetch_sitemap(&client, origin).await?;
    let urls = sitemap::parse_sitemap(&xml);

    for url in &urls {
        if !seo_only || sitemap::is_seo_relevant(url) {
            println!("{}", url);
        }
    }

    eprintln!("📄 {} URL(s) listed", urls.len());
    Ok(0)
}

// Prints the report either as a table or as JSON
fn print_report(report: &report::Report, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints the report as a human-readable table in the terminal
fn print_table(report: &report::Report) {
    println!();

    if !report.violations.is_empty() {
        println!("{:<60} {:<24} {:<40}", "URL", "REASON", "DETAIL");
        println!("{}", "=".repeat(124));

        for violation in &report.violations {
            let url_display = truncate_url(&violation.url);

            println!(
                "{:<60} {:<24} {:<40}",
                url_display,
                report::kind_label(violation.kind),
                violation.detail
            );
        }

        println!();
    }

    println!("📊 Summary:");
    println!("   📋 Checked: {}", report.total_checked);
    if report.is_passing() {
        println!("   ✅ All checks passed");
    } else {
        println!("   ❌ Violations: {}", report.violations.len());
    }
}

// Truncates a URL for table display
//
// Counts characters, not bytes: slicing a multibyte URL at a fixed byte
// offset would panic on a char boundary and lose the whole report.
fn truncate_url(url: &str) -> String {
    if url.chars().count() > 57 {
        let truncated: String = url.chars().take(57).collect();
        format!("{}...", truncated)
    } else {
        url.to_string()
    }
}

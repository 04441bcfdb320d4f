// Copyright 2026 Pricewatch Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod acquisition;
mod alert;
mod cli;
mod config;
mod diff;
mod run;
mod snapshot;
mod sources;

use config::Config;

#[derive(Parser)]
#[command(
    name = "pricewatch",
    about = "pricewatch — watch partner pages for displayed price changes",
    version,
    after_help = "Run 'pricewatch <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every source page and alert on price changes
    Run {
        /// Concurrent page fetches (1 = strictly sequential, in list order)
        #[arg(long, default_value = "1")]
        concurrency: usize,
        /// Log failing pages and keep going instead of aborting the batch
        #[arg(long)]
        skip_failures: bool,
        /// Run the full pipeline but do not send email
        #[arg(long)]
        no_email: bool,
    },
    /// Fetch a single page and print the prices found on it
    Extract {
        /// URL to scan
        url: String,
    },
    /// Validate the source list and show accepted/rejected lines
    Sources,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("PRICEWATCH_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("PRICEWATCH_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("PRICEWATCH_VERBOSE", "1");
    }

    init_tracing(cli.verbose);

    let config = Config::from_env();

    let result = match cli.command {
        Commands::Run {
            concurrency,
            skip_failures,
            no_email,
        } => cli::run_cmd::run(config, concurrency, skip_failures, no_email).await,
        Commands::Extract { url } => cli::extract_cmd::run(&config, &url).await,
        Commands::Sources => cli::sources_cmd::run(&config).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pricewatch", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    let directive = if verbose {
        "pricewatch=debug"
    } else {
        "pricewatch=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();
}

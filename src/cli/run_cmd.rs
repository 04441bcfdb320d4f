//! `pricewatch run` — one full check of every source page.

use anyhow::Result;
use tracing::warn;

use crate::acquisition::prices::ExtractOptions;
use crate::alert::smtp::SmtpMailer;
use crate::alert::{Mailer, NoopMailer};
use crate::cli::output;
use crate::config::Config;
use crate::run::{run_once, RunOutcome};

pub async fn run(
    config: Config,
    concurrency: usize,
    skip_failures: bool,
    no_email: bool,
) -> Result<()> {
    let opts = ExtractOptions {
        concurrency,
        skip_failures,
    };

    // Missing SMTP settings degrade the run to report-only rather than
    // failing it; a cron box without credentials still refreshes state.
    let mail_live = !no_email && config.smtp.is_some();
    let mailer: Box<dyn Mailer> = if no_email {
        Box::new(NoopMailer::new())
    } else if let Some(smtp) = config.smtp.clone() {
        Box::new(SmtpMailer::new(smtp))
    } else {
        warn!("SMTP is not configured; detected changes will not be emailed");
        Box::new(NoopMailer::new())
    };

    let report = run_once(&config, mailer.as_ref(), &opts).await?;

    if output::is_json() {
        output::print_json(&report);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    match report.outcome {
        RunOutcome::Bootstrap => {
            println!(
                "  First run: snapshot seeded at {}",
                config.snapshot_path.display()
            );
            println!(
                "  {} page(s) scanned, {} price(s) recorded.",
                report.urls_fetched, report.prices_seen
            );
        }
        RunOutcome::NoChanges => {
            println!(
                "  No price changes across {} page(s).",
                report.urls_fetched
            );
        }
        RunOutcome::Changed => {
            println!("  {} price change(s) detected:\n", report.changes.len());
            for alert in &report.alerts {
                println!("    {alert}");
            }
            println!();
            if report.alerts_dispatched && mail_live {
                println!("  Alert email sent.");
            } else {
                println!("  Alert email not sent (mail disabled or unconfigured).");
            }
            println!("  Report written to {}", config.report_path.display());
        }
    }

    Ok(())
}

//! One-shot batch run: extract, diff, alert, persist.
//!
//! The order is deliberate. Prices are extracted exactly once per run, the
//! diff runs against the snapshot from the previous run, and only then is
//! the snapshot replaced. A run that dies mid-way leaves the old snapshot
//! in place, so the next run re-detects the same changes instead of losing
//! them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::acquisition::http_client::HttpClient;
use crate::acquisition::prices::{extract_all, ExtractOptions};
use crate::alert::format::{alert_lines, fmt_price};
use crate::alert::{dispatch_alerts, Mailer};
use crate::config::Config;
use crate::diff::{diff_tables, ChangeRecord};
use crate::snapshot::{codec, PriceTable};
use crate::sources::load_sources;

/// What a run concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// No previous snapshot existed; this run only seeded one.
    Bootstrap,
    /// Snapshots were compared and no cell differed.
    NoChanges,
    /// Differences were found, reported, and (if mail is wired) alerted.
    Changed,
}

/// Summary of one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    /// Lines in the source list that passed the URL screen.
    pub urls_listed: usize,
    /// Pages actually fetched and scanned this run.
    pub urls_fetched: usize,
    /// Total prices extracted across all pages.
    pub prices_seen: usize,
    pub changes: Vec<ChangeRecord>,
    pub alerts: Vec<String>,
    /// Whether a non-empty alert batch was handed to the mailer. With mail
    /// disabled the batch is still dispatched, to a stub.
    pub alerts_dispatched: bool,
    pub elapsed_ms: u64,
}

/// Execute one full run against the configured source list.
pub async fn run_once(
    config: &Config,
    mailer: &dyn Mailer,
    opts: &ExtractOptions,
) -> Result<RunReport> {
    let started = std::time::Instant::now();
    let started_at = Utc::now();
    let run_id = Uuid::new_v4();

    std::fs::create_dir_all(&config.state_dir)
        .with_context(|| format!("creating state dir {}", config.state_dir.display()))?;
    let _lock = RunLock::acquire(&config.lock_path())?;

    let urls = load_sources(&config.sources_path)?;
    if urls.is_empty() {
        warn!(
            "source list {} has no usable URLs",
            config.sources_path.display()
        );
    }
    info!("run {run_id}: scanning {} source page(s)", urls.len());

    let client = HttpClient::new(&config.user_agent, config.timeout_ms);
    let mapping = extract_all(&client, &urls, opts).await?;
    let prices_seen = mapping.values().map(Vec::len).sum();
    let current = PriceTable::from_price_sets(&mapping);

    let previous = codec::load(&config.snapshot_path)?;

    let (outcome, changes, alerts, alerts_dispatched) = match previous {
        None => {
            info!(
                "no snapshot at {}; seeding one",
                config.snapshot_path.display()
            );
            (RunOutcome::Bootstrap, Vec::new(), Vec::new(), false)
        }
        Some(previous) => {
            let changes = diff_tables(&previous, &current);
            if changes.is_empty() {
                info!("no price changes detected");
                (RunOutcome::NoChanges, changes, Vec::new(), false)
            } else {
                info!("{} price cell(s) changed", changes.len());
                write_change_report(&config.report_path, &changes)?;
                let alerts = alert_lines(&changes);
                let sent = dispatch_alerts(mailer, &alerts).await?;
                (RunOutcome::Changed, changes, alerts, sent)
            }
        }
    };

    // The fresh snapshot always wins, changed or not.
    codec::save(&config.snapshot_path, &current)
        .with_context(|| format!("writing snapshot {}", config.snapshot_path.display()))?;

    Ok(RunReport {
        run_id,
        started_at,
        outcome,
        urls_listed: urls.len(),
        urls_fetched: mapping.len(),
        prices_seen,
        changes,
        alerts,
        alerts_dispatched,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

/// Persist the change report, one row per changed cell, replacing the
/// report of the previous changed run.
fn write_change_report(path: &Path, changes: &[ChangeRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("writing change report {}", path.display()))?;
    writer.write_record(["Rank", "URL", "Previous Price", "Current Price"])?;
    for c in changes {
        writer.write_record([
            c.rank.to_string(),
            c.url.clone(),
            fmt_price(c.previous),
            fmt_price(c.current),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

// ── Run lock ─────────────────────────────────────────────────────────────────

/// Lock file that serializes runs so two batches never interleave their
/// reads and writes of the snapshot.
///
/// The file holds the owner's PID. A lock whose process is gone is stale
/// and gets reclaimed; a lock whose process is alive aborts this run.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(pid) = live_lock_holder(path) {
            bail!(
                "another run is already in progress (PID {pid}, lock {})",
                path.display()
            );
        }
        std::fs::write(path, std::process::id().to_string())
            .with_context(|| format!("writing run lock {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// PID in the lock file, if that process is still alive.
fn live_lock_holder(path: &Path) -> Option<i32> {
    if !path.exists() {
        return None;
    }
    let pid_str = std::fs::read_to_string(path).ok()?;
    let pid: i32 = pid_str.trim().parse().ok()?;

    // Check if the process is actually alive
    #[cfg(unix)]
    {
        let output = std::process::Command::new("kill")
            .args(["-0", &pid.to_string()])
            .output();
        if matches!(output, Ok(o) if o.status.success()) {
            return Some(pid);
        }
    }

    // Stale lock file — clean up
    let _ = std::fs::remove_file(path);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_acquire_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricewatch.lock");

        {
            let _lock = RunLock::acquire(&path).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_stale_lock_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricewatch.lock");
        // A PID far beyond pid_max, so no live process can own it.
        std::fs::write(&path, "999999999").unwrap();

        let _lock = RunLock::acquire(&path).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_live_lock_blocks_acquisition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricewatch.lock");
        // Our own PID is certainly alive.
        std::fs::write(&path, std::process::id().to_string()).unwrap();

        let err = RunLock::acquire(&path).unwrap_err();
        assert!(format!("{err}").contains("already in progress"));
    }

    #[test]
    fn test_change_report_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price-changes.csv");

        let changes = vec![ChangeRecord {
            rank: 1,
            url: "https://a.example.com/x".to_string(),
            previous: 20.0,
            current: 25.0,
        }];
        write_change_report(&path, &changes).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();
        assert_eq!(
            lines.next(),
            Some("Rank,URL,Previous Price,Current Price")
        );
        assert_eq!(
            lines.next(),
            Some("1,https://a.example.com/x,20.0,25.0")
        );
    }
}

//! Alerting: change notification text and mail delivery.
//!
//! Defines the `Mailer` trait that abstracts over the delivery transport
//! (currently SMTP via lettre) so the pipeline can run end to end with
//! delivery stubbed out.

pub mod format;
pub mod smtp;

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// A transport that can deliver one batch of alert lines to the operator.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver the given alert lines as one message. Never called with an
    /// empty batch; `dispatch_alerts` short-circuits first.
    async fn deliver(&self, alerts: &[String]) -> Result<()>;
}

/// Deliver the alert batch, or do nothing at all when it is empty.
///
/// Returns whether a message went out. The empty case opens no connection
/// and builds no message; a run without changes leaves no delivery trace.
pub async fn dispatch_alerts(mailer: &dyn Mailer, alerts: &[String]) -> Result<bool> {
    if alerts.is_empty() {
        return Ok(false);
    }
    mailer.deliver(alerts).await?;
    Ok(true)
}

/// A mailer that swallows deliveries, used when mail is disabled or not
/// configured. The pipeline still runs end to end; only delivery is stubbed.
#[derive(Debug, Default)]
pub struct NoopMailer {
    delivered: AtomicUsize,
}

impl NoopMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches this mailer was asked to deliver.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Mailer for NoopMailer {
    async fn deliver(&self, alerts: &[String]) -> Result<()> {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        info!("mail disabled; holding back {} alert line(s)", alerts.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_batch_touches_no_mailer() {
        let mailer = NoopMailer::new();
        let sent = dispatch_alerts(&mailer, &[]).await.unwrap();
        assert!(!sent);
        assert_eq!(mailer.delivered(), 0);
    }

    #[tokio::test]
    async fn test_non_empty_batch_is_delivered_once() {
        let mailer = NoopMailer::new();
        let alerts = vec!["something changed".to_string()];
        let sent = dispatch_alerts(&mailer, &alerts).await.unwrap();
        assert!(sent);
        assert_eq!(mailer.delivered(), 1);
    }
}

//! SMTP delivery via lettre.
//!
//! One STARTTLS relay session per alert batch, authenticated with the
//! sender's credentials. The session is opened only when `deliver` is
//! actually called, so runs without changes never touch the relay.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::alert::format::{email_body, ALERT_SUBJECT};
use crate::alert::Mailer;
use crate::config::SmtpConfig;

/// Mailer that delivers alert batches through an SMTP relay.
pub struct SmtpMailer {
    smtp: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(smtp: SmtpConfig) -> Self {
        Self { smtp }
    }
}

/// Assemble the alert message for one batch.
fn build_message(smtp: &SmtpConfig, alerts: &[String]) -> Result<Message> {
    Message::builder()
        .from(smtp.from.parse().context("invalid sender address")?)
        .to(smtp.to.parse().context("invalid recipient address")?)
        .subject(ALERT_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(email_body(alerts))
        .context("building alert message")
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, alerts: &[String]) -> Result<()> {
        let message = build_message(&self.smtp, alerts)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp.host)
            .context("configuring SMTP relay")?
            .port(self.smtp.port)
            .credentials(Credentials::new(
                self.smtp.from.clone(),
                self.smtp.password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .with_context(|| format!("sending alert email via {}", self.smtp.host))?;
        info!(
            "alert email with {} line(s) sent to {}",
            alerts.len(),
            self.smtp.to
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            from: "alerts@example.com".to_string(),
            password: "secret".to_string(),
            to: "team@example.com".to_string(),
        }
    }

    #[test]
    fn test_message_carries_subject_and_recipient() {
        let message = build_message(&smtp_config(), &["one line".to_string()]).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Subject: Price Changes Alert!!!"));
        assert!(rendered.contains("To: team@example.com"));
    }

    #[test]
    fn test_bad_sender_address_is_rejected() {
        let mut config = smtp_config();
        config.from = "not an address".to_string();
        assert!(build_message(&config, &["line".to_string()]).is_err());
    }
}

//! Operator-facing alert text.
//!
//! The wording here is load-bearing: downstream mail filters and the content
//! team's inbox rules key on these exact phrases. Change them and somebody's
//! filter goes quiet.

use crate::diff::ChangeRecord;

/// Subject line of every change alert email.
pub const ALERT_SUBJECT: &str = "Price Changes Alert!!!";

const BODY_PREAMBLE: &str = "Hi Content team!\n\n\
You are receiving this alert because the price for some of our partners has been changed.\n\n\
See the summary below.";

/// Format one price the way the alerts always have: integral values keep a
/// trailing `.0`, fractional values print in shortest form.
pub fn fmt_price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// One alert line per change record, in record order.
pub fn alert_lines(changes: &[ChangeRecord]) -> Vec<String> {
    changes
        .iter()
        .map(|c| {
            format!(
                "A price value on page {} has been changed from ${} to ${}",
                c.url,
                fmt_price(c.previous),
                fmt_price(c.current)
            )
        })
        .collect()
}

/// Compose the plain-text email body: preamble, then one paragraph per alert.
pub fn email_body(alerts: &[String]) -> String {
    let mut body = String::from(BODY_PREAMBLE);
    for alert in alerts {
        body.push_str("\n\n");
        body.push_str(alert);
    }
    body
}

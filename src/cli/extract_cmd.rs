//! `pricewatch extract <url>` — scan a single page and print its price set.
//!
//! Touches no state: no snapshot, no report, no lock. Useful for checking
//! what the scanner sees on a page before adding it to the source list.

use anyhow::{bail, Result};

use crate::acquisition::http_client::HttpClient;
use crate::acquisition::prices::extract_prices;
use crate::alert::format::fmt_price;
use crate::cli::output;
use crate::config::Config;
use crate::sources::is_valid_url;

pub async fn run(config: &Config, url: &str) -> Result<()> {
    if !is_valid_url(url) {
        bail!("'{url}' does not look like an http(s) URL");
    }

    let client = HttpClient::new(&config.user_agent, config.timeout_ms);
    let body = client.get(url).await?;
    let prices = tokio::task::spawn_blocking(move || extract_prices(&body)).await?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "url": url,
            "prices": prices,
        }));
    } else if prices.is_empty() {
        println!("  No dollar prices found on {url}.");
    } else {
        println!("  {} price(s) on {url}:\n", prices.len());
        for price in &prices {
            println!("    ${}", fmt_price(*price));
        }
    }

    Ok(())
}

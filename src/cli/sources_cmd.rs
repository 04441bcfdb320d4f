//! `pricewatch sources` — show which source-list lines pass the URL screen.
//!
//! The run command drops bad lines silently; this command is where an
//! operator finds out why a page is not being watched.

use anyhow::Result;

use crate::cli::output;
use crate::config::Config;
use crate::sources::{is_valid_url, read_candidates};

pub async fn run(config: &Config) -> Result<()> {
    let candidates = read_candidates(&config.sources_path)?;

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for line in candidates {
        if is_valid_url(&line) {
            accepted.push(line);
        } else {
            rejected.push(line);
        }
    }

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "path": config.sources_path.display().to_string(),
            "accepted": accepted,
            "rejected": rejected,
        }));
        return Ok(());
    }

    println!(
        "  {} of {} line(s) in {} pass the URL screen",
        accepted.len(),
        accepted.len() + rejected.len(),
        config.sources_path.display()
    );
    for url in &accepted {
        println!("    + {url}");
    }
    for line in &rejected {
        println!("    - {line:?}");
    }

    Ok(())
}

//! Dollar-price extraction from raw HTML.
//!
//! The scanner selects an allow-list of tag kinds, keeps the elements whose
//! text mentions `$`, and runs a dollar-amount regex over their serialized
//! markup. Serializing the whole element keeps amounts that nesting splits
//! across child tags, at the cost of also matching amounts that only appear
//! in attribute markup. That trade-off is accepted: a false positive costs
//! one spurious alert line, a false negative misses a price change.
//!
//! `extract_prices` is **synchronous** because the `scraper` crate's types
//! are `!Send` -- async callers wrap it in `tokio::task::spawn_blocking`,
//! which is what `extract_all` does.

use indexmap::IndexMap;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::acquisition::http_client::HttpClient;

/// Tag kinds scanned for price text. The `class` entry is a long-standing
/// allow-list passenger that matches no standard HTML element; it is kept
/// so the screened tag set stays stable.
const PRICE_TAGS: &str = "h1, h2, span, div, a, title, del, p, class";

/// How the batch walks its URL list.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Concurrent page fetches. 1 means strictly sequential, in list order.
    pub concurrency: usize,
    /// Drop failing pages from the run instead of aborting the batch.
    pub skip_failures: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            skip_failures: false,
        }
    }
}

// ── Extraction ───────────────────────────────────────────────────────────────

/// Extract the sorted, deduplicated dollar amounts displayed on one page.
pub fn extract_prices(html: &str) -> Vec<f64> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(PRICE_TAGS).expect("price tag selector is valid");
    let dollar_re = Regex::new(r"\$([0-9]+(\.[0-9]+)?)").expect("dollar regex is valid");

    // Serialize every allow-listed element that mentions a dollar sign into
    // one haystack. Nested matches serialize their parent too; duplicates
    // wash out below.
    let mut haystack = String::new();
    for el in document.select(&selector) {
        if el.text().any(|chunk| chunk.contains('$')) {
            haystack.push_str(&el.html());
            haystack.push('\n');
        }
    }

    let mut prices: Vec<f64> = dollar_re
        .captures_iter(&haystack)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    // Dedup after numeric conversion so `$5` and `$5.00` collapse into one
    // value rather than surviving as distinct strings.
    prices.sort_by(|a, b| a.total_cmp(b));
    prices.dedup();
    prices
}

// ── Batch walk ───────────────────────────────────────────────────────────────

/// Fetch every URL and build the run's price mapping, keyed by the exact
/// source-list string and ordered the way the list is.
///
/// The default policy is fail-fast: the first fetch error aborts the whole
/// batch and no partial mapping escapes. With `skip_failures` set, a failing
/// page is logged and dropped from the mapping and the batch continues.
pub async fn extract_all(
    client: &HttpClient,
    urls: &[String],
    opts: &ExtractOptions,
) -> anyhow::Result<IndexMap<String, Vec<f64>>> {
    use futures::stream::{self, StreamExt};

    // Lazy buffered stream: results come back in list order, and dropping
    // the stream on an early abort cancels whatever is still in flight.
    let mut pages = Box::pin(
        stream::iter(urls.to_vec())
            .map(|url| {
                let client = client.clone();
                async move {
                    let fetched = client.get(&url).await;
                    (url, fetched)
                }
            })
            .buffered(opts.concurrency.max(1)),
    );

    let mut mapping = IndexMap::new();
    while let Some((url, fetched)) = pages.next().await {
        match fetched {
            Ok(body) => {
                let prices = tokio::task::spawn_blocking(move || extract_prices(&body)).await?;
                debug!("{url}: {} price(s) found", prices.len());
                mapping.insert(url, prices);
            }
            Err(err) if opts.skip_failures => {
                warn!("skipping failed page: {err}");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(mapping)
}

//! Page acquisition: plain HTTP fetches and dollar-price extraction.
//!
//! Not a browser. Pages are fetched as raw HTML over HTTP and scanned for
//! displayed dollar amounts; anything rendered client-side is out of reach
//! and out of scope.

pub mod http_client;
pub mod prices;

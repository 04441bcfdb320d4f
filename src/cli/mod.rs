//! CLI subcommand implementations for the pricewatch binary.

pub mod extract_cmd;
pub mod output;
pub mod run_cmd;
pub mod sources_cmd;

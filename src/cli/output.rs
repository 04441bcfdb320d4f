//! Output-mode helpers shared by the subcommands.
//!
//! The global `--json`, `--quiet`, and `--verbose` flags are propagated as
//! environment variables by `main` so every module can check them without
//! threading booleans through each call chain.

use serde::Serialize;

/// Whether `--json` was passed: machine-readable output only.
pub fn is_json() -> bool {
    flag_set("PRICEWATCH_JSON")
}

/// Whether `--quiet` was passed: suppress non-essential output.
pub fn is_quiet() -> bool {
    flag_set("PRICEWATCH_QUIET")
}

/// Whether `--verbose` was passed: debug-level logging.
pub fn is_verbose() -> bool {
    flag_set("PRICEWATCH_VERBOSE")
}

fn flag_set(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("  Error: failed to serialize output: {e}"),
    }
}

// Copyright 2026 Pricewatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pricewatch library — watch partner pages for displayed price changes.
//!
//! This library crate exposes the pipeline modules for integration testing.

#![allow(
    dead_code,
    unused_imports,
    clippy::new_without_default,
    clippy::should_implement_trait
)]

pub mod acquisition;
pub mod alert;
pub mod cli;
pub mod config;
pub mod diff;
pub mod run;
pub mod snapshot;
pub mod sources;

#![doc(test(attr(deny(warnings))))]

//! Donation Core models a donation platform: a multi-step donation wizard with
//! validation, a submission adapter over pluggable storage, donation tracking, an
//! NGO directory, account sessions and an optional wallet connection.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Donation Core tracing initialized.");
    });
}

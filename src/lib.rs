#![doc(test(attr(deny(warnings))))]

//! RentEase Ledger answers occurrence and aggregation questions over a
//! snapshot of property transactions, including recurring ones.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("RentEase Ledger tracing initialized.");
    });
}

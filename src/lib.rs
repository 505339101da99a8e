//! Core library for the `scrapeprobe` CLI.
//!
//! The crate ramps virtual workers over a staged load profile, probes
//! readiness and metrics endpoints on every iteration, and evaluates check
//! tallies and latency/failure-rate thresholds into a pass/fail verdict. The
//! primary user-facing interface is the `scrapeprobe` binary; library APIs
//! may evolve as the CLI grows.
pub mod args;
pub mod checks;
pub mod config;
pub mod error;
pub mod load;
pub mod probe;
pub mod shutdown;

mod app;
mod entry;
mod logger;
mod shutdown_handlers;

pub use entry::run;

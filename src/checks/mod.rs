//! Assertion engine: named per-target checks, run aggregates, and threshold
//! evaluation at the end of a run.
mod engine;
mod percentile;
mod predicate;
mod threshold;
mod verdict;

#[cfg(test)]
mod tests;

pub use engine::{AssertionEngine, CheckOutcome};
pub use percentile::{LatencySamples, nearest_rank};
pub use predicate::{CheckKind, CheckSpec, Predicate, body_contains, status_is};
pub use threshold::{Comparator, ThresholdMetric, ThresholdRule, parse_scaled_decimal};
pub use verdict::{
    CheckTally, LatencyStats, RuleOutcome, RunSummary, Verdict, format_latency_us, format_ppm,
    ratio_ppm,
};

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::probe::{ProbeFailure, ProbeResult, ProbeTarget};

use super::percentile::LatencySamples;
use super::predicate::Predicate;
use super::threshold::ThresholdRule;
use super::verdict::{CheckTally, LatencyStats, RunSummary, Verdict, ratio_ppm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
}

struct RegisteredCheck {
    name: String,
    predicate: Predicate,
    slot: usize,
}

#[derive(Default)]
struct RunTally {
    latencies: Vec<Duration>,
    total: u64,
    failed: u64,
    timeouts: u64,
    transport_errors: u64,
    checks: Vec<CheckTally>,
}

/// Evaluates registered checks and accumulates run aggregates.
///
/// Shared between workers behind an `Arc`; aggregates are append-only until
/// [`AssertionEngine::finalize`] reduces them.
pub struct AssertionEngine {
    target_names: Vec<String>,
    checks: Vec<Vec<RegisteredCheck>>,
    tally: Mutex<RunTally>,
}

impl AssertionEngine {
    #[must_use]
    pub fn new(target_names: Vec<String>) -> Self {
        let checks = target_names.iter().map(|_name| Vec::new()).collect();
        Self {
            target_names,
            checks,
            tally: Mutex::new(RunTally::default()),
        }
    }

    /// Creates an engine with every check declared on `targets` registered.
    #[must_use]
    pub fn from_targets(targets: &[ProbeTarget]) -> Self {
        let mut engine = Self::new(targets.iter().map(|target| target.name.clone()).collect());
        for (index, target) in targets.iter().enumerate() {
            for check in &target.checks {
                engine.register_check(index, check.name.as_str(), check.kind.predicate());
            }
        }
        engine
    }

    pub fn register_check(&mut self, target: usize, name: impl Into<String>, predicate: Predicate) {
        if self.checks.len() <= target {
            let missing = target.saturating_add(1);
            for idx in self.target_names.len()..missing {
                self.target_names.push(format!("target-{}", idx));
            }
            self.checks.resize_with(missing, Vec::new);
        }
        let name = name.into();
        let target_name = self
            .target_names
            .get(target)
            .cloned()
            .unwrap_or_default();

        let tally = self.tally.get_mut().unwrap_or_else(PoisonError::into_inner);
        let slot = tally.checks.len();
        tally.checks.push(CheckTally {
            target: target_name,
            name: name.clone(),
            passes: 0,
            fails: 0,
        });

        if let Some(target_checks) = self.checks.get_mut(target) {
            target_checks.push(RegisteredCheck {
                name,
                predicate,
                slot,
            });
        }
    }

    /// Runs every check registered for the result's target and records the
    /// result in the run aggregates.
    pub fn evaluate(&self, result: ProbeResult) -> Vec<CheckOutcome> {
        let registered: &[RegisteredCheck] = self
            .checks
            .get(result.target)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let outcomes: Vec<(usize, CheckOutcome)> = registered
            .iter()
            .map(|check| {
                let passed = (check.predicate)(&result);
                if !passed {
                    debug!(
                        "Check '{}' failed (status {}, latency {:?})",
                        check.name, result.status, result.latency
                    );
                }
                (
                    check.slot,
                    CheckOutcome {
                        name: check.name.clone(),
                        passed,
                    },
                )
            })
            .collect();

        {
            let mut tally = self.tally.lock().unwrap_or_else(PoisonError::into_inner);
            tally.latencies.push(result.latency);
            tally.total = tally.total.saturating_add(1);
            if !result.is_success() {
                tally.failed = tally.failed.saturating_add(1);
            }
            match result.failure {
                Some(ProbeFailure::Timeout) => {
                    tally.timeouts = tally.timeouts.saturating_add(1);
                }
                Some(ProbeFailure::Transport) => {
                    tally.transport_errors = tally.transport_errors.saturating_add(1);
                }
                None => {}
            }
            for (slot, outcome) in &outcomes {
                if let Some(check) = tally.checks.get_mut(*slot) {
                    if outcome.passed {
                        check.passes = check.passes.saturating_add(1);
                    } else {
                        check.fails = check.fails.saturating_add(1);
                    }
                }
            }
        }

        outcomes.into_iter().map(|(_slot, outcome)| outcome).collect()
    }

    /// Reduces the aggregates and evaluates every threshold rule.
    #[must_use]
    pub fn finalize(&self, rules: &[ThresholdRule], elapsed: Duration) -> Verdict {
        let (latencies, total, failed, timeouts, transport_errors, checks) = {
            let tally = self.tally.lock().unwrap_or_else(PoisonError::into_inner);
            (
                tally.latencies.clone(),
                tally.total,
                tally.failed,
                tally.timeouts,
                tally.transport_errors,
                tally.checks.clone(),
            )
        };

        let samples = LatencySamples::from_unsorted(latencies);
        let checks_passed = checks
            .iter()
            .fold(0u64, |sum, check| sum.saturating_add(check.passes));
        let checks_failed = checks
            .iter()
            .fold(0u64, |sum, check| sum.saturating_add(check.fails));

        let summary = RunSummary {
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            total_probes: total,
            failed_probes: failed,
            timeouts,
            transport_errors,
            failure_rate_ppm: ratio_ppm(failed, total),
            checks_passed,
            checks_failed,
            checks_rate_ppm: ratio_ppm(
                checks_passed,
                checks_passed.saturating_add(checks_failed),
            ),
            latency: LatencyStats::from_samples(&samples),
            checks,
        };

        let outcomes = rules
            .iter()
            .map(|rule| rule.evaluate(&samples, &summary))
            .collect();
        Verdict::new(summary, outcomes)
    }
}

use serde::Serialize;

use super::percentile::LatencySamples;
use super::threshold::PPM;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LatencyStats {
    pub avg_us: u64,
    pub min_us: u64,
    pub max_us: u64,
    pub p50_us: u64,
    pub p90_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
}

impl LatencyStats {
    #[must_use]
    pub fn from_samples(samples: &LatencySamples) -> Self {
        let micros = |value: std::time::Duration| u64::try_from(value.as_micros()).unwrap_or(u64::MAX);
        Self {
            avg_us: micros(samples.avg()),
            min_us: micros(samples.min()),
            max_us: micros(samples.max()),
            p50_us: micros(samples.percentile(50)),
            p90_us: micros(samples.percentile(90)),
            p95_us: micros(samples.percentile(95)),
            p99_us: micros(samples.percentile(99)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckTally {
    pub target: String,
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub duration_ms: u64,
    pub total_probes: u64,
    pub failed_probes: u64,
    pub timeouts: u64,
    pub transport_errors: u64,
    pub failure_rate_ppm: u64,
    pub checks_passed: u64,
    pub checks_failed: u64,
    pub checks_rate_ppm: u64,
    pub latency: LatencyStats,
    pub checks: Vec<CheckTally>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: String,
    pub observed: String,
    pub passed: bool,
}

/// Final run outcome: aggregate metrics plus one result per threshold rule.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub summary: RunSummary,
    pub thresholds: Vec<RuleOutcome>,
}

impl Verdict {
    #[must_use]
    pub fn new(summary: RunSummary, thresholds: Vec<RuleOutcome>) -> Self {
        let passed = thresholds.iter().all(|outcome| outcome.passed);
        Self {
            passed,
            summary,
            thresholds,
        }
    }

    #[must_use]
    pub fn failed_rules(&self) -> usize {
        self.thresholds
            .iter()
            .filter(|outcome| !outcome.passed)
            .count()
    }
}

/// Floor of `numerator / denominator` in parts per million; zero when empty.
#[must_use]
pub fn ratio_ppm(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let scaled = u128::from(numerator)
        .saturating_mul(u128::from(PPM))
        .checked_div(u128::from(denominator))
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Formats microseconds as milliseconds with two decimals.
#[must_use]
pub fn format_latency_us(micros: u64) -> String {
    let hundredths = micros.checked_div(10).unwrap_or(0);
    format!(
        "{}.{:02}ms",
        hundredths.checked_div(100).unwrap_or(0),
        hundredths.checked_rem(100).unwrap_or(0)
    )
}

/// Formats parts per million as a percentage with two decimals.
#[must_use]
pub fn format_ppm(ppm: u64) -> String {
    let hundredths = ppm.checked_div(100).unwrap_or(0);
    format!(
        "{}.{:02}%",
        hundredths.checked_div(100).unwrap_or(0),
        hundredths.checked_rem(100).unwrap_or(0)
    )
}

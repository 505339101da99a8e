use std::str::FromStr;

use crate::error::ValidationError;

use super::percentile::LatencySamples;
use super::verdict::{RuleOutcome, RunSummary, format_latency_us, format_ppm};

/// Fractional digits kept for latency limits (milliseconds to microseconds).
const LATENCY_SCALE_DIGITS: u32 = 3;
/// Fractional digits kept for rate limits (parts per million).
const RATE_SCALE_DIGITS: u32 = 6;
pub(crate) const PPM: u64 = 1_000_000;

const DURATION_METRIC: &str = "http_req_duration";
const FAILED_METRIC: &str = "http_req_failed";
const CHECKS_METRIC: &str = "checks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMetric {
    LatencyPercentile(u8),
    LatencyAvg,
    LatencyMin,
    LatencyMax,
    LatencyMedian,
    FailureRate,
    CheckRate,
}

impl ThresholdMetric {
    #[must_use]
    pub const fn is_rate(self) -> bool {
        matches!(self, ThresholdMetric::FailureRate | ThresholdMetric::CheckRate)
    }

    #[must_use]
    pub const fn family(self) -> &'static str {
        match self {
            ThresholdMetric::LatencyPercentile(_)
            | ThresholdMetric::LatencyAvg
            | ThresholdMetric::LatencyMin
            | ThresholdMetric::LatencyMax
            | ThresholdMetric::LatencyMedian => DURATION_METRIC,
            ThresholdMetric::FailureRate => FAILED_METRIC,
            ThresholdMetric::CheckRate => CHECKS_METRIC,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparator {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "<" => Some(Comparator::Lt),
            "<=" => Some(Comparator::Le),
            ">" => Some(Comparator::Gt),
            ">=" => Some(Comparator::Ge),
            "==" | "===" => Some(Comparator::Eq),
            "!=" | "!==" => Some(Comparator::Ne),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
        }
    }

    #[must_use]
    pub fn holds<T: Ord>(self, observed: T, limit: T) -> bool {
        match self {
            Comparator::Lt => observed < limit,
            Comparator::Le => observed <= limit,
            Comparator::Gt => observed > limit,
            Comparator::Ge => observed >= limit,
            Comparator::Eq => observed == limit,
            Comparator::Ne => observed != limit,
        }
    }
}

/// Pass/fail criterion evaluated against aggregated run data.
///
/// `limit` is in microseconds for latency metrics and in parts per million
/// for rate metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdRule {
    pub metric: ThresholdMetric,
    pub comparator: Comparator,
    pub limit: u64,
    pub source: String,
}

impl ThresholdRule {
    /// Parses a rule from a metric name and a k6-style expression such as
    /// `p(95)<500` or `rate<0.01`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown metrics, unsupported statistics, or
    /// malformed limits.
    pub fn parse_parts(metric: &str, expression: &str) -> Result<Self, ValidationError> {
        let metric = metric.trim();
        let expression = expression.trim();
        let source = format!("{}:{}", metric, expression);
        let (stat, comparator, value) =
            split_expression(expression).ok_or_else(|| {
                ValidationError::InvalidThresholdExpression {
                    value: source.clone(),
                    reason: "expected <stat><op><limit>",
                }
            })?;

        let parsed_metric = match metric {
            DURATION_METRIC => parse_latency_stat(stat).ok_or_else(|| {
                ValidationError::InvalidThresholdExpression {
                    value: source.clone(),
                    reason: "use avg, min, max, med, or p(N) with N in 1..=100",
                }
            })?,
            FAILED_METRIC | CHECKS_METRIC => {
                if stat != "rate" {
                    return Err(ValidationError::InvalidThresholdExpression {
                        value: source,
                        reason: "rate metrics only support 'rate'",
                    });
                }
                if metric == FAILED_METRIC {
                    ThresholdMetric::FailureRate
                } else {
                    ThresholdMetric::CheckRate
                }
            }
            _ => {
                return Err(ValidationError::UnknownThresholdMetric {
                    metric: metric.to_owned(),
                });
            }
        };

        let limit = if parsed_metric.is_rate() {
            let ppm = parse_scaled_decimal(value, RATE_SCALE_DIGITS)?;
            if ppm > PPM {
                return Err(ValidationError::InvalidThresholdExpression {
                    value: source,
                    reason: "rate limit must be between 0 and 1",
                });
            }
            ppm
        } else {
            parse_scaled_decimal(value, LATENCY_SCALE_DIGITS)?
        };

        Ok(Self {
            metric: parsed_metric,
            comparator,
            limit,
            source,
        })
    }

    #[must_use]
    pub fn evaluate(&self, samples: &LatencySamples, summary: &RunSummary) -> RuleOutcome {
        let (passed, observed) = match self.metric {
            ThresholdMetric::FailureRate => {
                let passed = self.rate_holds(summary.failed_probes, summary.total_probes);
                (passed, format_ppm(summary.failure_rate_ppm))
            }
            ThresholdMetric::CheckRate => {
                let total = summary.checks_passed.saturating_add(summary.checks_failed);
                let passed = self.rate_holds(summary.checks_passed, total);
                (passed, format_ppm(summary.checks_rate_ppm))
            }
            ThresholdMetric::LatencyPercentile(_)
            | ThresholdMetric::LatencyAvg
            | ThresholdMetric::LatencyMin
            | ThresholdMetric::LatencyMax
            | ThresholdMetric::LatencyMedian => {
                let observed_us = latency_for(self.metric, samples);
                let passed = self
                    .comparator
                    .holds(u128::from(observed_us), u128::from(self.limit));
                (passed, format_latency_us(observed_us))
            }
        };
        RuleOutcome {
            rule: self.source.clone(),
            observed,
            passed,
        }
    }

    /// Compares `numerator / denominator` against the limit without rounding.
    fn rate_holds(&self, numerator: u64, denominator: u64) -> bool {
        let (numerator, denominator) = if denominator == 0 {
            (0, 1)
        } else {
            (numerator, denominator)
        };
        let observed = u128::from(numerator).saturating_mul(u128::from(PPM));
        let limit = u128::from(self.limit).saturating_mul(u128::from(denominator));
        self.comparator.holds(observed, limit)
    }
}

impl FromStr for ThresholdRule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (metric, expression) =
            s.split_once(':')
                .ok_or_else(|| ValidationError::InvalidThresholdFormat {
                    value: s.to_owned(),
                })?;
        ThresholdRule::parse_parts(metric, expression)
    }
}

fn latency_for(metric: ThresholdMetric, samples: &LatencySamples) -> u64 {
    let value = match metric {
        ThresholdMetric::LatencyPercentile(p) => samples.percentile(p),
        ThresholdMetric::LatencyMedian => samples.percentile(50),
        ThresholdMetric::LatencyAvg => samples.avg(),
        ThresholdMetric::LatencyMin => samples.min(),
        ThresholdMetric::LatencyMax => samples.max(),
        ThresholdMetric::FailureRate | ThresholdMetric::CheckRate => return 0,
    };
    u64::try_from(value.as_micros()).unwrap_or(u64::MAX)
}

fn split_expression(expression: &str) -> Option<(&str, Comparator, &str)> {
    let is_op = |ch: char| matches!(ch, '<' | '>' | '=' | '!');
    let start = expression.find(is_op)?;
    let (stat, rest) = expression.split_at(start);
    let op_len = rest.find(|ch: char| !is_op(ch)).unwrap_or(rest.len());
    let (op, value) = rest.split_at(op_len);
    let comparator = Comparator::parse(op)?;
    let stat = stat.trim();
    let value = value.trim();
    if stat.is_empty() || value.is_empty() {
        return None;
    }
    Some((stat, comparator, value))
}

fn parse_latency_stat(stat: &str) -> Option<ThresholdMetric> {
    match stat {
        "avg" => Some(ThresholdMetric::LatencyAvg),
        "min" => Some(ThresholdMetric::LatencyMin),
        "max" => Some(ThresholdMetric::LatencyMax),
        "med" => Some(ThresholdMetric::LatencyMedian),
        _ => {
            let inner = stat.strip_prefix("p(")?.strip_suffix(')')?;
            let percentile: u8 = inner.trim().parse().ok()?;
            if (1..=100).contains(&percentile) {
                Some(ThresholdMetric::LatencyPercentile(percentile))
            } else {
                None
            }
        }
    }
}

/// Parses a non-negative decimal into an integer scaled by `10^scale_digits`.
///
/// `"0.01"` with 6 digits yields `10_000`; `"500"` with 3 digits yields
/// `500_000`.
///
/// # Errors
///
/// Returns an error for signs, non-digits, overflow, or more fractional
/// digits than the scale allows.
pub fn parse_scaled_decimal(value: &str, scale_digits: u32) -> Result<u64, ValidationError> {
    let trimmed = value.trim();
    let invalid = || ValidationError::InvalidDecimal {
        value: value.to_owned(),
    };
    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }
    let max_frac = usize::try_from(scale_digits).unwrap_or(usize::MAX);
    if frac_part.len() > max_frac {
        return Err(invalid());
    }

    let scale = 10u64.checked_pow(scale_digits).ok_or_else(invalid)?;
    let int_value = if int_part.is_empty() {
        0
    } else {
        int_part.parse::<u64>().ok().ok_or_else(invalid)?
    };
    let frac_value = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_part, width = max_frac);
        padded.parse::<u64>().ok().ok_or_else(invalid)?
    };

    int_value
        .checked_mul(scale)
        .and_then(|scaled| scaled.checked_add(frac_value))
        .ok_or_else(invalid)
}

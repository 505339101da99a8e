use super::*;
use crate::probe::{ProbeFailure, ProbeResult, ProbeTarget};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn response(target: usize, status: u16, body: &str, latency_ms: u64) -> ProbeResult {
    ProbeResult::response(
        target,
        status,
        body.to_owned(),
        Duration::from_millis(latency_ms),
        Utc::now(),
    )
}

fn metrics_target() -> Result<ProbeTarget, String> {
    let url = Url::parse("http://localhost:12345/metrics").map_err(|err| err.to_string())?;
    Ok(ProbeTarget::new(
        "metrics".to_owned(),
        url,
        vec![
            CheckSpec::new("metrics endpoint returns 200", CheckKind::Status(200)),
            CheckSpec::new(
                "metrics contain alloy_build_info",
                CheckKind::BodyContains("alloy_build_info".to_owned()),
            ),
            CheckSpec::new(
                "scrape targets active",
                CheckKind::BodyContains("scrape_samples_scraped".to_owned()),
            ),
        ],
    ))
}

const HEALTHY_BODY: &str = "alloy_build_info{version=\"v1\"} 1\nscrape_samples_scraped 42\n";

fn rule(text: &str) -> Result<ThresholdRule, String> {
    text.parse::<ThresholdRule>()
        .map_err(|err| format!("parse '{}' failed: {}", text, err))
}

#[test]
fn predicates_are_pure_functions_of_the_result() -> Result<(), String> {
    let ok = response(0, 200, HEALTHY_BODY, 10);
    let not_found = response(0, 404, "", 10);

    let status = status_is(200);
    if !status(&ok) || status(&not_found) {
        return Err("status_is(200) mismatch".to_owned());
    }
    let contains = body_contains("alloy_build_info");
    if !contains(&ok) || contains(&not_found) {
        return Err("body_contains mismatch".to_owned());
    }
    Ok(())
}

#[test]
fn healthy_result_passes_every_check() -> Result<(), String> {
    let engine = AssertionEngine::from_targets(&[metrics_target()?]);
    let outcomes = engine.evaluate(response(0, 200, HEALTHY_BODY, 12));
    if outcomes.len() != 3 {
        return Err(format!("Expected 3 outcomes, got {}", outcomes.len()));
    }
    if let Some(failed) = outcomes.iter().find(|outcome| !outcome.passed) {
        return Err(format!("Unexpected failed check '{}'", failed.name));
    }
    Ok(())
}

#[test]
fn non_200_fails_status_check_and_counts_as_failure() -> Result<(), String> {
    let engine = AssertionEngine::from_targets(&[metrics_target()?]);
    let outcomes = engine.evaluate(response(0, 503, HEALTHY_BODY, 12));
    let status_outcome = outcomes
        .iter()
        .find(|outcome| outcome.name == "metrics endpoint returns 200")
        .ok_or_else(|| "Missing status outcome".to_owned())?;
    if status_outcome.passed {
        return Err("Status check should fail for 503".to_owned());
    }

    let verdict = engine.finalize(&[], Duration::from_secs(1));
    if verdict.summary.failed_probes != 1 || verdict.summary.failure_rate_ppm != 1_000_000 {
        return Err(format!("Unexpected summary: {:?}", verdict.summary));
    }
    Ok(())
}

#[test]
fn network_failures_fail_every_check_and_are_classified() -> Result<(), String> {
    let engine = AssertionEngine::from_targets(&[metrics_target()?]);
    let now = Utc::now();
    let latency = Duration::from_millis(100);
    let timeout = engine.evaluate(ProbeResult::failed(0, ProbeFailure::Timeout, latency, now));
    let refused = engine.evaluate(ProbeResult::failed(0, ProbeFailure::Transport, latency, now));
    if timeout.iter().chain(refused.iter()).any(|outcome| outcome.passed) {
        return Err("Network failures must not pass checks".to_owned());
    }
    let verdict = engine.finalize(&[], Duration::from_secs(1));
    if verdict.summary.timeouts != 1 || verdict.summary.transport_errors != 1 {
        return Err(format!("Unexpected failure split: {:?}", verdict.summary));
    }
    if verdict.summary.checks_failed != 6 || verdict.summary.checks_passed != 0 {
        return Err("Unexpected check tallies".to_owned());
    }
    Ok(())
}

#[test]
fn results_for_unregistered_targets_still_aggregate() -> Result<(), String> {
    let engine = AssertionEngine::from_targets(&[metrics_target()?]);
    let outcomes = engine.evaluate(response(7, 200, "", 5));
    if !outcomes.is_empty() {
        return Err("Expected no outcomes for unknown target".to_owned());
    }
    let verdict = engine.finalize(&[], Duration::from_secs(1));
    if verdict.summary.total_probes != 1 {
        return Err("Expected probe to be counted".to_owned());
    }
    Ok(())
}

#[test]
fn register_check_extends_target_table() -> Result<(), String> {
    let mut engine = AssertionEngine::new(vec!["ready".to_owned()]);
    engine.register_check(0, "ready is 200", status_is(200));
    engine.register_check(2, "third target body", body_contains("up"));
    let outcomes = engine.evaluate(response(2, 200, "oracledb_up 1", 5));
    if outcomes.len() != 1 || outcomes.iter().any(|outcome| !outcome.passed) {
        return Err(format!("Unexpected outcomes: {:?}", outcomes));
    }
    let verdict = engine.finalize(&[], Duration::ZERO);
    let names: Vec<&str> = verdict
        .summary
        .checks
        .iter()
        .map(|check| check.target.as_str())
        .collect();
    if names != ["ready", "target-2"] {
        return Err(format!("Unexpected target names: {:?}", names));
    }
    Ok(())
}

#[test]
fn p95_uses_nearest_rank() -> Result<(), String> {
    let mut samples = vec![Duration::from_millis(100); 100];
    samples.extend(vec![Duration::from_millis(1000); 5]);
    let latencies = LatencySamples::from_unsorted(samples);
    if latencies.percentile(95) != Duration::from_millis(100) {
        return Err(format!("Unexpected p95 {:?}", latencies.percentile(95)));
    }
    if latencies.percentile(99) != Duration::from_millis(1000) {
        return Err(format!("Unexpected p99 {:?}", latencies.percentile(99)));
    }
    if latencies.max() != Duration::from_millis(1000) || latencies.min() != Duration::from_millis(100) {
        return Err("Unexpected min/max".to_owned());
    }
    Ok(())
}

#[test]
fn nearest_rank_small_samples() -> Result<(), String> {
    let sorted: Vec<Duration> = (1..=10).map(Duration::from_millis).collect();
    let cases = [(1, 1), (50, 5), (90, 9), (95, 10), (100, 10)];
    for (percentile, expected_ms) in cases {
        let actual = nearest_rank(&sorted, percentile);
        if actual != Duration::from_millis(expected_ms) {
            return Err(format!(
                "p{} expected {}ms, got {:?}",
                percentile, expected_ms, actual
            ));
        }
    }
    if nearest_rank(&[], 95) != Duration::ZERO {
        return Err("Expected zero for empty samples".to_owned());
    }
    Ok(())
}

#[test]
fn average_is_integral_micros() -> Result<(), String> {
    let samples = LatencySamples::from_unsorted(vec![
        Duration::from_millis(10),
        Duration::from_millis(20),
        Duration::from_millis(40),
    ]);
    let expected = Duration::from_micros(23_333);
    if samples.avg() != expected {
        return Err(format!("Unexpected average {:?}", samples.avg()));
    }
    Ok(())
}

#[test]
fn parses_k6_style_rules() -> Result<(), String> {
    let p95 = rule("http_req_duration:p(95)<500")?;
    if p95.metric != ThresholdMetric::LatencyPercentile(95)
        || p95.comparator != Comparator::Lt
        || p95.limit != 500_000
    {
        return Err(format!("Unexpected p95 rule: {:?}", p95));
    }

    let failed = rule("http_req_failed:rate<0.01")?;
    if failed.metric != ThresholdMetric::FailureRate || failed.limit != 10_000 {
        return Err(format!("Unexpected rate rule: {:?}", failed));
    }

    let checks = rule(" checks : rate >= 0.995 ")?;
    if checks.metric != ThresholdMetric::CheckRate
        || checks.comparator != Comparator::Ge
        || checks.limit != 995_000
    {
        return Err(format!("Unexpected checks rule: {:?}", checks));
    }

    let avg = rule("http_req_duration:avg<=12.5")?;
    if avg.metric != ThresholdMetric::LatencyAvg || avg.limit != 12_500 {
        return Err(format!("Unexpected avg rule: {:?}", avg));
    }
    let med = rule("http_req_duration:med!=3")?;
    if med.metric != ThresholdMetric::LatencyMedian || med.comparator != Comparator::Ne {
        return Err(format!("Unexpected med rule: {:?}", med));
    }
    Ok(())
}

#[test]
fn rejects_malformed_rules() -> Result<(), String> {
    let bad = [
        "p(95)<500",
        "http_req_duration:p(95)",
        "http_req_duration:p(0)<5",
        "http_req_duration:p(101)<5",
        "http_req_duration:p95<5",
        "http_req_duration:rate<0.1",
        "http_req_failed:p(95)<5",
        "http_req_failed:rate<1.5",
        "http_req_failed:rate<-0.1",
        "http_req_failed:rate<0.0000001",
        "http_req_failed:rate<>0.1",
        "http_reqs:count<10",
        "http_req_duration:<500",
        "http_req_duration:avg<",
    ];
    for text in bad {
        if text.parse::<ThresholdRule>().is_ok() {
            return Err(format!("Expected '{}' to be rejected", text));
        }
    }
    Ok(())
}

#[test]
fn scaled_decimal_parsing() -> Result<(), String> {
    let cases = [
        ("0.01", 6, 10_000),
        ("1", 6, 1_000_000),
        (".5", 6, 500_000),
        ("500", 3, 500_000),
        ("12.25", 3, 12_250),
        ("7.", 3, 7_000),
    ];
    for (value, digits, expected) in cases {
        let parsed = parse_scaled_decimal(value, digits).map_err(|err| err.to_string())?;
        if parsed != expected {
            return Err(format!("{} parsed as {}, expected {}", value, parsed, expected));
        }
    }
    for value in ["", ".", "1.2.3", "+1", "abc", "1.0001"] {
        if parse_scaled_decimal(value, 3).is_ok() {
            return Err(format!("Expected '{}' to be rejected", value));
        }
    }
    Ok(())
}

#[test]
fn five_percent_failures_break_one_percent_rule() -> Result<(), String> {
    let engine = AssertionEngine::from_targets(&[metrics_target()?]);
    for idx in 0..100u64 {
        let status = if idx % 20 == 0 { 500 } else { 200 };
        drop(engine.evaluate(response(0, status, HEALTHY_BODY, 50)));
    }
    let rules = [
        rule("http_req_duration:p(95)<500")?,
        rule("http_req_failed:rate<0.01")?,
    ];
    let verdict = engine.finalize(&rules, Duration::from_secs(10));
    if verdict.summary.failure_rate_ppm < 50_000 {
        return Err(format!(
            "Expected failure rate >= 5%, got {} ppm",
            verdict.summary.failure_rate_ppm
        ));
    }
    if verdict.passed || verdict.failed_rules() != 1 {
        return Err(format!("Expected exactly one failed rule: {:?}", verdict.thresholds));
    }
    let rate_outcome = verdict
        .thresholds
        .iter()
        .find(|outcome| outcome.rule == "http_req_failed:rate<0.01")
        .ok_or_else(|| "Missing rate outcome".to_owned())?;
    if rate_outcome.passed || rate_outcome.observed != "5.00%" {
        return Err(format!("Unexpected rate outcome: {:?}", rate_outcome));
    }
    Ok(())
}

#[test]
fn rate_comparison_is_exact() -> Result<(), String> {
    let engine = AssertionEngine::from_targets(&[metrics_target()?]);
    // 1 failure in 3 probes is just above 0.333333.
    drop(engine.evaluate(response(0, 500, "", 1)));
    drop(engine.evaluate(response(0, 200, HEALTHY_BODY, 1)));
    drop(engine.evaluate(response(0, 200, HEALTHY_BODY, 1)));
    let rules = [
        rule("http_req_failed:rate>0.333333")?,
        rule("http_req_failed:rate<0.333334")?,
    ];
    let verdict = engine.finalize(&rules, Duration::from_secs(1));
    if !verdict.passed {
        return Err(format!("Expected both rules to pass: {:?}", verdict.thresholds));
    }
    Ok(())
}

#[test]
fn empty_run_reports_zero_metrics() -> Result<(), String> {
    let engine = AssertionEngine::from_targets(&[metrics_target()?]);
    let rules = [
        rule("http_req_duration:p(95)<500")?,
        rule("http_req_failed:rate<0.01")?,
    ];
    let verdict = engine.finalize(&rules, Duration::ZERO);
    if !verdict.passed {
        return Err(format!("Expected pass on empty run: {:?}", verdict.thresholds));
    }
    if verdict.summary.total_probes != 0 || verdict.summary.latency.p95_us != 0 {
        return Err("Expected zeroed summary".to_owned());
    }
    Ok(())
}

#[test]
fn concurrent_evaluation_loses_no_updates() -> Result<(), String> {
    let engine = Arc::new(AssertionEngine::from_targets(&[metrics_target()?]));
    std::thread::scope(|scope| {
        for _ in 0..8 {
            let engine = Arc::clone(&engine);
            scope.spawn(move || {
                for _ in 0..250 {
                    drop(engine.evaluate(response(0, 200, HEALTHY_BODY, 3)));
                }
            });
        }
    });
    let verdict = engine.finalize(&[], Duration::from_secs(1));
    if verdict.summary.total_probes != 2_000 {
        return Err(format!("Lost probe updates: {}", verdict.summary.total_probes));
    }
    if verdict.summary.checks_passed != 6_000 {
        return Err(format!("Lost check updates: {}", verdict.summary.checks_passed));
    }
    Ok(())
}

#[test]
fn formatting_helpers() -> Result<(), String> {
    let cases = [
        (format_latency_us(50_000), "50.00ms"),
        (format_latency_us(1_234), "1.23ms"),
        (format_ppm(50_000), "5.00%"),
        (format_ppm(1_000_000), "100.00%"),
        (format_ppm(0), "0.00%"),
    ];
    for (actual, expected) in cases {
        if actual != expected {
            return Err(format!("Expected {}, got {}", expected, actual));
        }
    }
    if ratio_ppm(1, 0) != 0 || ratio_ppm(1, 4) != 250_000 {
        return Err("Unexpected ratio".to_owned());
    }
    Ok(())
}

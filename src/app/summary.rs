use crate::checks::{format_latency_us, format_ppm};
use crate::entry::RunPlan;

use super::runner::RunOutcome;

/// Milliseconds per second.
const MS_PER_SEC: u64 = 1_000;

pub(crate) fn report_lines(plan: &RunPlan, outcome: &RunOutcome) -> Vec<String> {
    let report = &outcome.report;
    let summary = &outcome.verdict.summary;
    let latency = &summary.latency;
    let mut lines = Vec::new();

    lines.push(format!(
        "Preset: {} ({})",
        plan.preset.as_str(),
        plan.base_url
    ));
    lines.push(format!("Duration: {}", format_seconds(summary.duration_ms)));
    if report.interrupted {
        lines.push("Interrupted: yes (shutdown requested)".to_owned());
    }
    lines.push(format!("Iterations: {}", report.iterations));
    lines.push(format!("Peak Workers: {}", report.peak_workers));
    lines.push(format!("Total Probes: {}", summary.total_probes));
    lines.push(format!(
        "Failed Probes: {} ({})",
        summary.failed_probes,
        format_ppm(summary.failure_rate_ppm)
    ));
    lines.push(format!("Timeouts: {}", summary.timeouts));
    lines.push(format!("Transport Errors: {}", summary.transport_errors));
    lines.push(format!(
        "Latency avg/min/max: {} / {} / {}",
        format_latency_us(latency.avg_us),
        format_latency_us(latency.min_us),
        format_latency_us(latency.max_us)
    ));
    lines.push(format!(
        "Latency p50/p90/p95/p99: {} / {} / {} / {}",
        format_latency_us(latency.p50_us),
        format_latency_us(latency.p90_us),
        format_latency_us(latency.p95_us),
        format_latency_us(latency.p99_us)
    ));

    lines.push(format!(
        "Checks: {} passed, {} failed ({})",
        summary.checks_passed,
        summary.checks_failed,
        format_ppm(summary.checks_rate_ppm)
    ));
    for check in &summary.checks {
        let mark = if check.fails == 0 { "ok" } else { "!!" };
        lines.push(format!(
            "  [{}] {} / {}: {} passed, {} failed",
            mark, check.target, check.name, check.passes, check.fails
        ));
    }

    if !outcome.verdict.thresholds.is_empty() {
        lines.push("Thresholds:".to_owned());
    }
    for rule in &outcome.verdict.thresholds {
        lines.push(format!(
            "  {} (observed {}): {}",
            rule.rule,
            rule.observed,
            pass_label(rule.passed)
        ));
    }
    lines.push(format!("Result: {}", pass_label(outcome.verdict.passed)));
    lines
}

pub(crate) fn print_report(plan: &RunPlan, outcome: &RunOutcome) {
    for line in report_lines(plan, outcome) {
        println!("{}", line);
    }
}

const fn pass_label(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

fn format_seconds(duration_ms: u64) -> String {
    let centis = duration_ms.checked_div(10).unwrap_or(0);
    format!(
        "{}.{:02}s",
        duration_ms.checked_div(MS_PER_SEC).unwrap_or(0),
        centis.checked_rem(100).unwrap_or(0)
    )
}

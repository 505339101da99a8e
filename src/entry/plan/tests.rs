use super::RunPlan;
use crate::args::test_support::parse_test_args;
use crate::args::{Preset, TesterArgs};
use crate::checks::{CheckKind, ThresholdMetric};
use crate::config::types::TargetConfig;
use crate::error::{AppError, AppResult, ConfigError};
use std::time::Duration;

fn no_env(_name: &str) -> Option<String> {
    None
}

fn plan_for(cli: &[&str]) -> AppResult<RunPlan> {
    RunPlan::from_args(parse_test_args(cli)?, no_env)
}

fn target_urls(plan: &RunPlan) -> Vec<String> {
    plan.targets
        .iter()
        .map(|target| target.url.to_string())
        .collect()
}

#[test]
fn alloy_preset_defaults() -> AppResult<()> {
    let plan = plan_for(&[])?;
    if plan.preset != Preset::Alloy {
        return Err(AppError::validation("Expected alloy preset"));
    }
    if target_urls(&plan)
        != [
            "http://localhost:12345/-/ready",
            "http://localhost:12345/metrics",
        ]
    {
        return Err(AppError::validation(format!(
            "Unexpected urls {:?}",
            target_urls(&plan)
        )));
    }

    let check_names: Vec<Vec<&str>> = plan
        .targets
        .iter()
        .map(|target| target.checks.iter().map(|check| check.name.as_str()).collect())
        .collect();
    let expected = vec![
        vec!["alloy is ready"],
        vec![
            "metrics endpoint returns 200",
            "metrics contain alloy_build_info",
            "metrics contain remote_write data",
            "scrape targets active",
        ],
    ];
    if check_names != expected {
        return Err(AppError::validation(format!(
            "Unexpected checks {:?}",
            check_names
        )));
    }

    let stages: Vec<(Duration, u64)> = plan
        .profile
        .stages()
        .iter()
        .map(|stage| (stage.duration, stage.target))
        .collect();
    if stages
        != [
            (Duration::from_secs(30), 10),
            (Duration::from_secs(60), 10),
            (Duration::from_secs(30), 0),
        ]
    {
        return Err(AppError::validation(format!(
            "Unexpected stages {:?}",
            stages
        )));
    }

    let rules: Vec<(ThresholdMetric, u64)> = plan
        .thresholds
        .iter()
        .map(|rule| (rule.metric, rule.limit))
        .collect();
    if rules
        != [
            (ThresholdMetric::LatencyPercentile(95), 500_000),
            (ThresholdMetric::FailureRate, 10_000),
        ]
    {
        return Err(AppError::validation(format!(
            "Unexpected thresholds {:?}",
            rules
        )));
    }
    if plan.driver.think_time != Duration::from_secs(1) {
        return Err(AppError::validation("Unexpected think time"));
    }
    Ok(())
}

#[test]
fn preset_url_comes_from_environment() -> AppResult<()> {
    let env = |name: &str| (name == "ALLOY_URL").then(|| "http://alloy.internal:12345".to_owned());
    let plan = RunPlan::from_args(parse_test_args(&[])?, env)?;
    if plan.base_url.as_str() != "http://alloy.internal:12345/" {
        return Err(AppError::validation(format!(
            "Unexpected base url {}",
            plan.base_url
        )));
    }

    let plan = RunPlan::from_args(parse_test_args(&["-u", "http://cli:1"])?, env)?;
    if plan.base_url.as_str() != "http://cli:1/" {
        return Err(AppError::validation("Explicit url should win over ALLOY_URL"));
    }

    let blank = |_name: &str| Some("  ".to_owned());
    let plan = RunPlan::from_args(parse_test_args(&[])?, blank)?;
    if plan.base_url.as_str() != "http://localhost:12345/" {
        return Err(AppError::validation("Blank env value should be ignored"));
    }
    Ok(())
}

#[test]
fn oracledb_exporter_preset() -> AppResult<()> {
    let env = |name: &str| (name == "EXPORTER_URL").then(|| "http://db:9161".to_owned());
    let plan = RunPlan::from_args(
        parse_test_args(&["--preset", "oracledb-exporter"])?,
        env,
    )?;
    if target_urls(&plan) != ["http://db:9161/metrics"] {
        return Err(AppError::validation(format!(
            "Unexpected urls {:?}",
            target_urls(&plan)
        )));
    }
    let target = plan
        .targets
        .first()
        .ok_or_else(|| AppError::validation("Missing target"))?;
    let fragments: Vec<&str> = target.expected_body().collect();
    if fragments != ["oracledb_up", "oracledb_activity_execute_count"] {
        return Err(AppError::validation(format!(
            "Unexpected fragments {:?}",
            fragments
        )));
    }
    Ok(())
}

#[test]
fn base_path_prefix_is_kept() -> AppResult<()> {
    let plan = plan_for(&["-u", "http://proxy:8080/alloy"])?;
    if target_urls(&plan)
        != [
            "http://proxy:8080/alloy/-/ready",
            "http://proxy:8080/alloy/metrics",
        ]
    {
        return Err(AppError::validation(format!(
            "Unexpected urls {:?}",
            target_urls(&plan)
        )));
    }
    Ok(())
}

#[test]
fn invalid_base_url_fails_fast() -> AppResult<()> {
    match plan_for(&["-u", "not a url"]) {
        Err(AppError::Config(ConfigError::InvalidBaseUrl { .. })) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected InvalidBaseUrl, got {:?}",
            other.map(|_plan| ())
        ))),
    }
}

fn args_with_targets(targets: Vec<TargetConfig>) -> AppResult<TesterArgs> {
    let mut args = parse_test_args(&["-u", "http://svc:9000"])?;
    args.targets = Some(targets);
    Ok(args)
}

#[test]
fn custom_targets_replace_preset() -> AppResult<()> {
    let args = args_with_targets(vec![
        TargetConfig {
            name: "metrics".to_owned(),
            path: Some("/metrics".to_owned()),
            body_contains: vec!["up".to_owned()],
            ..TargetConfig::default()
        },
        TargetConfig {
            name: "health".to_owned(),
            url: Some("http://other:1/healthz".to_owned()),
            status: Some(204),
            ..TargetConfig::default()
        },
    ])?;
    let plan = RunPlan::from_args(args, no_env)?;
    if target_urls(&plan) != ["http://svc:9000/metrics", "http://other:1/healthz"] {
        return Err(AppError::validation(format!(
            "Unexpected urls {:?}",
            target_urls(&plan)
        )));
    }
    let health = plan
        .targets
        .get(1)
        .ok_or_else(|| AppError::validation("Missing health target"))?;
    if health.expected_status() != Some(204) {
        return Err(AppError::validation("Unexpected health status"));
    }
    let metrics = plan
        .targets
        .first()
        .ok_or_else(|| AppError::validation("Missing metrics target"))?;
    let kinds: Vec<&CheckKind> = metrics.checks.iter().map(|check| &check.kind).collect();
    if kinds != [&CheckKind::Status(200), &CheckKind::BodyContains("up".to_owned())] {
        return Err(AppError::validation(format!("Unexpected checks {:?}", kinds)));
    }
    Ok(())
}

#[test]
fn invalid_custom_targets_fail_fast() -> AppResult<()> {
    let conflict = TargetConfig {
        name: "both".to_owned(),
        path: Some("/a".to_owned()),
        url: Some("http://b/".to_owned()),
        ..TargetConfig::default()
    };
    let missing = TargetConfig {
        name: "neither".to_owned(),
        ..TargetConfig::default()
    };
    let bad_status = TargetConfig {
        name: "status".to_owned(),
        path: Some("/".to_owned()),
        status: Some(42),
        ..TargetConfig::default()
    };

    match RunPlan::from_args(args_with_targets(vec![conflict])?, no_env) {
        Err(AppError::Config(ConfigError::TargetUrlPathConflict { index: 0 })) => {}
        other => {
            return Err(AppError::validation(format!(
                "Expected conflict, got {:?}",
                other.map(|_plan| ())
            )));
        }
    }
    match RunPlan::from_args(args_with_targets(vec![missing])?, no_env) {
        Err(AppError::Config(ConfigError::TargetMissingUrlOrPath { index: 0 })) => {}
        other => {
            return Err(AppError::validation(format!(
                "Expected missing url/path, got {:?}",
                other.map(|_plan| ())
            )));
        }
    }
    if RunPlan::from_args(args_with_targets(vec![bad_status])?, no_env).is_ok() {
        return Err(AppError::validation("Expected status validation error"));
    }
    match RunPlan::from_args(args_with_targets(Vec::new())?, no_env) {
        Err(AppError::Config(ConfigError::NoTargets)) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected NoTargets, got {:?}",
            other.map(|_plan| ())
        ))),
    }
}

#[test]
fn explicit_empty_stages_give_empty_profile() -> AppResult<()> {
    let mut args = parse_test_args(&[])?;
    args.stages = Some(Vec::new());
    let plan = RunPlan::from_args(args, no_env)?;
    if !plan.profile.is_empty() {
        return Err(AppError::validation("Expected empty profile"));
    }
    Ok(())
}

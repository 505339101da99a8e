use std::time::Duration;

use clap::ArgMatches;
use tracing::debug;
use url::Url;

use crate::args::TesterArgs;
use crate::checks::{CheckKind, CheckSpec, ThresholdRule};
use crate::config::types::TargetConfig;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::load::{DriverSettings, LoadProfile, StageSpec};
use crate::probe::{ProbeSettings, ProbeTarget};

use super::presets::{DEFAULT_STAGES, DEFAULT_THRESHOLDS, PresetDefinition, definition};
use super::types::RunPlan;

const MIN_STATUS: u16 = 100;
const MAX_STATUS: u16 = 599;

pub(crate) fn build_plan(args: TesterArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    let args = apply_config(args, matches)?;
    RunPlan::from_args(args, |name| std::env::var(name).ok())
}

fn apply_config(mut args: TesterArgs, matches: &ArgMatches) -> AppResult<TesterArgs> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }
    Ok(args)
}

impl RunPlan {
    /// Resolves presets and defaults into a validated plan. `env` looks up
    /// the preset's URL variable.
    pub(crate) fn from_args<F>(args: TesterArgs, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let preset = definition(args.preset);
        let base_url = resolve_base_url(args.url.as_deref(), preset, &env)?;

        let targets = match args.targets.as_deref() {
            Some(custom) => custom_targets(&base_url, custom)?,
            None => preset_targets(&base_url, preset)?,
        };
        if targets.is_empty() {
            return Err(AppError::config(ConfigError::NoTargets));
        }

        let stages = match args.stages {
            Some(stages) => stages,
            None => default_stages(),
        };
        let thresholds = match args.thresholds {
            Some(thresholds) => thresholds,
            None => default_thresholds()?,
        };

        debug!(
            "Plan: preset {}, base {}, {} target(s), {} stage(s), {} threshold(s)",
            args.preset.as_str(),
            base_url,
            targets.len(),
            stages.len(),
            thresholds.len()
        );

        Ok(Self {
            preset: args.preset,
            base_url,
            profile: LoadProfile::new(stages),
            targets,
            thresholds,
            driver: DriverSettings {
                tick_interval: args.tick_interval,
                think_time: args.think_time,
            },
            probe: ProbeSettings {
                request_timeout: args.request_timeout,
                connect_timeout: args.connect_timeout,
                user_agent: args.user_agent,
                max_body_bytes: args.max_body_bytes.get(),
            },
            summary_export: args.summary_export,
            quiet: args.quiet,
        })
    }
}

fn resolve_base_url<F>(url: Option<&str>, preset: &PresetDefinition, env: &F) -> AppResult<Url>
where
    F: Fn(&str) -> Option<String>,
{
    let from_env = env(preset.url_env).filter(|value| !value.trim().is_empty());
    let raw = url
        .map(str::to_owned)
        .or(from_env)
        .unwrap_or_else(|| preset.default_url.to_owned());
    let raw = raw.trim();
    Url::parse(raw).map_err(|err| {
        AppError::config(ConfigError::InvalidBaseUrl {
            url: raw.to_owned(),
            source: err,
        })
    })
}

/// Appends `path` to the base URL, keeping any path prefix the base carries.
fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
}

fn preset_targets(base: &Url, preset: &PresetDefinition) -> AppResult<Vec<ProbeTarget>> {
    preset
        .targets
        .iter()
        .map(|target| {
            let url = join_path(base, target.path).map_err(|err| {
                AppError::config(ConfigError::InvalidTargetUrl {
                    name: target.name.to_owned(),
                    source: err,
                })
            })?;
            Ok(ProbeTarget::new(target.name.to_owned(), url, target.checks()))
        })
        .collect()
}

fn custom_targets(base: &Url, targets: &[TargetConfig]) -> AppResult<Vec<ProbeTarget>> {
    let mut built = Vec::with_capacity(targets.len());
    for (index, target) in targets.iter().enumerate() {
        let name = if target.name.trim().is_empty() {
            format!("target-{}", index)
        } else {
            target.name.trim().to_owned()
        };
        let parsed = match (target.url.as_deref(), target.path.as_deref()) {
            (Some(_), Some(_)) => {
                return Err(AppError::config(ConfigError::TargetUrlPathConflict { index }));
            }
            (None, None) => {
                return Err(AppError::config(ConfigError::TargetMissingUrlOrPath { index }));
            }
            (Some(url), None) => Url::parse(url.trim()),
            (None, Some(path)) => join_path(base, path.trim()),
        };
        let url = parsed.map_err(|err| {
            AppError::config(ConfigError::InvalidTargetUrl {
                name: name.clone(),
                source: err,
            })
        })?;

        let status = target.status.unwrap_or(200);
        validate_status(index, status)?;
        let mut checks = Vec::with_capacity(target.body_contains.len().saturating_add(1));
        checks.push(CheckSpec::new(
            format!("{} returns {}", name, status),
            CheckKind::Status(status),
        ));
        for fragment in &target.body_contains {
            checks.push(CheckSpec::new(
                format!("{} contains {}", name, fragment),
                CheckKind::BodyContains(fragment.clone()),
            ));
        }
        built.push(ProbeTarget::new(name, url, checks));
    }
    Ok(built)
}

fn validate_status(index: usize, status: u16) -> AppResult<()> {
    let source = if status < MIN_STATUS {
        ValidationError::ValueTooSmall {
            min: u64::from(MIN_STATUS),
        }
    } else if status > MAX_STATUS {
        ValidationError::ValueTooLarge {
            max: u64::from(MAX_STATUS),
        }
    } else {
        return Ok(());
    };
    Err(AppError::config(ConfigError::InvalidField {
        field: format!("targets[{}].status", index),
        source,
    }))
}

fn default_stages() -> Vec<StageSpec> {
    DEFAULT_STAGES
        .iter()
        .map(|(secs, target)| StageSpec {
            duration: Duration::from_secs(*secs),
            target: *target,
        })
        .collect()
}

fn default_thresholds() -> AppResult<Vec<ThresholdRule>> {
    DEFAULT_THRESHOLDS
        .iter()
        .map(|(metric, expression)| {
            ThresholdRule::parse_parts(metric, expression)
                .map_err(|source| AppError::config(ConfigError::InvalidThreshold { source }))
        })
        .collect()
}

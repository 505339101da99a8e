use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, TesterArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::parse::{parse_stages, parse_thresholds};
use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to arguments not set on the command line or
/// through the environment.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "preset")
        && let Some(preset) = config.preset
    {
        args.preset = preset;
    }

    if !is_explicit(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_explicit(matches, "stages")
        && let Some(stages) = config.stages.as_ref()
    {
        args.stages = Some(parse_stages(stages)?);
    }

    if !is_explicit(matches, "thresholds")
        && let Some(thresholds) = config.thresholds.as_ref()
    {
        args.thresholds = Some(parse_thresholds(thresholds)?);
    }

    if !is_explicit(matches, "think_time")
        && let Some(think_time) = config.think_time.as_ref()
    {
        args.think_time = think_time
            .to_duration()
            .map_err(|err| invalid_field("think_time", err))?;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = positive_duration(timeout, "timeout")?;
    }

    if !is_explicit(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = positive_duration(timeout, "connect_timeout")?;
    }

    if !is_explicit(matches, "tick_interval")
        && let Some(interval) = config.tick_interval.as_ref()
    {
        args.tick_interval = positive_duration(interval, "tick_interval")?;
    }

    if !is_explicit(matches, "max_body_bytes")
        && let Some(bytes) = config.max_body_bytes
    {
        args.max_body_bytes =
            PositiveUsize::try_from(bytes).map_err(|err| invalid_field("max_body_bytes", err))?;
    }

    if !is_explicit(matches, "user_agent")
        && let Some(user_agent) = config.user_agent.clone()
    {
        args.user_agent = user_agent;
    }

    if !is_explicit(matches, "summary_export")
        && let Some(path) = config.summary_export.clone()
    {
        args.summary_export = Some(path);
    }

    if !is_explicit(matches, "quiet")
        && let Some(quiet) = config.quiet
    {
        args.quiet = quiet;
    }

    if let Some(targets) = config.targets.clone() {
        args.targets = Some(targets);
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn positive_duration(value: &DurationValue, field: &str) -> AppResult<std::time::Duration> {
    value
        .to_positive_duration()
        .map_err(|err| invalid_field(field, err))
}

fn invalid_field(field: &str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidField {
        field: field.to_owned(),
        source,
    })
}

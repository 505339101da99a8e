use std::time::Duration;

use super::defaults::MAX_STAGE_TARGET;
use super::types::PositiveUsize;
use crate::checks::ThresholdRule;
use crate::error::{AppError, AppResult, ValidationError};
use crate::load::StageSpec;

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

/// Parses `<number>[ms|s|m|h]`; a bare number is seconds. Zero is allowed.
pub(crate) fn parse_duration_value(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let mut digits_len = 0usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits_len = digits_len.saturating_add(1);
        } else {
            break;
        }
    }
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    match unit {
        "ms" => Ok(Duration::from_millis(number)),
        "s" => Ok(Duration::from_secs(number)),
        "m" => number
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow),
        "h" => number
            .checked_mul(60)
            .and_then(|minutes| minutes.checked_mul(60))
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow),
        _ => Err(ValidationError::InvalidDurationUnit {
            unit: unit.to_owned(),
        }),
    }
}

pub(crate) fn parse_positive_duration(s: &str) -> Result<Duration, ValidationError> {
    let duration = parse_duration_value(s)?;
    if duration.as_millis() == 0 {
        return Err(ValidationError::DurationZero);
    }
    Ok(duration)
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_positive_duration(s).map_err(AppError::validation)
}

pub(super) fn parse_think_time(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::validation)
}

/// Parses a `<duration>:<target>` stage such as `30s:10`.
pub(crate) fn parse_stage(s: &str) -> Result<StageSpec, ValidationError> {
    let (duration, target) =
        s.split_once(':')
            .ok_or_else(|| ValidationError::InvalidStageFormat {
                value: s.to_owned(),
            })?;
    let duration = parse_positive_duration(duration)?;
    let target: u64 =
        target
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidStageTarget {
                value: s.to_owned(),
                source: err,
            })?;
    stage_from_parts(duration, target)
}

pub(crate) fn stage_from_parts(duration: Duration, target: u64) -> Result<StageSpec, ValidationError> {
    if duration.as_millis() == 0 {
        return Err(ValidationError::DurationZero);
    }
    if target > MAX_STAGE_TARGET {
        return Err(ValidationError::ValueTooLarge {
            max: MAX_STAGE_TARGET,
        });
    }
    Ok(StageSpec { duration, target })
}

pub(crate) fn parse_threshold(s: &str) -> Result<ThresholdRule, ValidationError> {
    s.parse::<ThresholdRule>()
}

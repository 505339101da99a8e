use std::collections::BTreeMap;

use crate::args::parsers::stage_from_parts;
use crate::checks::ThresholdRule;
use crate::error::{AppError, AppResult, ConfigError};
use crate::load::StageSpec;

use super::types::StageConfig;

pub(crate) fn parse_stages(stages: &[StageConfig]) -> AppResult<Vec<StageSpec>> {
    let mut parsed = Vec::with_capacity(stages.len());
    for (index, stage) in stages.iter().enumerate() {
        let invalid = |source| AppError::config(ConfigError::InvalidStage { index, source });
        let duration = stage.duration.to_positive_duration().map_err(invalid)?;
        parsed.push(stage_from_parts(duration, stage.target).map_err(invalid)?);
    }
    Ok(parsed)
}

/// Flattens `{ metric = ["expr", ...] }` into rules, in metric-name order.
pub(crate) fn parse_thresholds(
    thresholds: &BTreeMap<String, Vec<String>>,
) -> AppResult<Vec<ThresholdRule>> {
    let mut rules = Vec::new();
    for (metric, expressions) in thresholds {
        for expression in expressions {
            let rule = ThresholdRule::parse_parts(metric, expression)
                .map_err(|source| AppError::config(ConfigError::InvalidThreshold { source }))?;
            rules.push(rule);
        }
    }
    Ok(rules)
}

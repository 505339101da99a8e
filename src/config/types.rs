use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::args::Preset;
use crate::args::parsers::{parse_duration_value, parse_positive_duration};
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub preset: Option<Preset>,
    pub url: Option<String>,
    pub stages: Option<Vec<StageConfig>>,
    /// k6-style map: metric name to a list of expressions.
    pub thresholds: Option<BTreeMap<String, Vec<String>>>,
    pub think_time: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub tick_interval: Option<DurationValue>,
    pub max_body_bytes: Option<usize>,
    pub user_agent: Option<String>,
    pub summary_export: Option<String>,
    pub quiet: Option<bool>,
    pub targets: Option<Vec<TargetConfig>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub duration: DurationValue,
    pub target: u64,
}

/// Custom probe target. `path` is joined onto the base URL; `url` is used as is.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TargetConfig {
    pub name: String,
    pub path: Option<String>,
    pub url: Option<String>,
    pub status: Option<u16>,
    #[serde(default)]
    pub body_contains: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }

    pub(crate) fn to_positive_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_positive_duration(text),
        }
    }
}

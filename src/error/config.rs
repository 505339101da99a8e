use super::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Config '{field}' is invalid: {source}")]
    InvalidField {
        field: String,
        #[source]
        source: ValidationError,
    },
    #[error("Invalid stage {index}: {source}")]
    InvalidStage {
        index: usize,
        #[source]
        source: ValidationError,
    },
    #[error("Invalid threshold: {source}")]
    InvalidThreshold {
        #[source]
        source: ValidationError,
    },
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid URL for target '{name}': {source}")]
    InvalidTargetUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Target {index} must define url or path.")]
    TargetMissingUrlOrPath { index: usize },
    #[error("Target {index} cannot define both url and path.")]
    TargetUrlPathConflict { index: usize },
    #[error("At least one probe target is required.")]
    NoTargets,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}

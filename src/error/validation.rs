use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Value must be <= {max}.")]
    ValueTooLarge { max: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid stage '{value}'. Expected '<duration>:<target>' (e.g. 30s:10).")]
    InvalidStageFormat { value: String },
    #[error("Invalid stage target in '{value}': {source}")]
    InvalidStageTarget {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid threshold '{value}'. Expected '<metric>:<expression>' (e.g. http_req_failed:rate<0.01).")]
    InvalidThresholdFormat { value: String },
    #[error("Unknown threshold metric '{metric}'. Use http_req_duration, http_req_failed, or checks.")]
    UnknownThresholdMetric { metric: String },
    #[error("Invalid threshold expression '{value}': {reason}")]
    InvalidThresholdExpression { value: String, reason: &'static str },
    #[error("Invalid decimal '{value}'.")]
    InvalidDecimal { value: String },
    #[error("{failed} of {total} threshold(s) failed.")]
    ThresholdsFailed { failed: usize, total: usize },
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

use clap::Parser;
use std::time::Duration;

use crate::checks::ThresholdRule;
use crate::config::types::TargetConfig;
use crate::load::StageSpec;

use super::defaults::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_BODY_BYTES, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_THINK_TIME, DEFAULT_TICK_INTERVAL, DEFAULT_USER_AGENT,
};
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_positive_usize, parse_stage, parse_think_time,
    parse_threshold,
};
use super::types::{PositiveUsize, Preset};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Synthetic load and endpoint verification for telemetry endpoints - ramps virtual workers over staged schedules, checks status codes and metric names, and fails the run when thresholds are breached."
)]
pub struct TesterArgs {
    /// Endpoint preset to probe
    #[arg(
        long,
        short = 'p',
        default_value = "alloy",
        value_enum,
        env = "SCRAPEPROBE_PRESET",
        help_heading = "Common Options"
    )]
    pub preset: Preset,

    /// Base URL of the service under test (defaults to ALLOY_URL/EXPORTER_URL, then the preset's local address)
    #[arg(long, short, env = "SCRAPEPROBE_URL", help_heading = "Common Options")]
    pub url: Option<String>,

    /// Ramp stage as '<duration>:<target>' (repeatable or comma-separated, e.g. 30s:10,1m:10,30s:0)
    #[arg(
        long = "stage",
        short = 's',
        env = "SCRAPEPROBE_STAGES",
        value_delimiter = ',',
        value_parser = parse_stage,
        help_heading = "Common Options"
    )]
    pub stages: Option<Vec<StageSpec>>,

    /// Threshold rule as '<metric>:<expression>' (e.g. http_req_duration:p(95)<500)
    #[arg(
        long = "threshold",
        env = "SCRAPEPROBE_THRESHOLDS",
        value_delimiter = ',',
        value_parser = parse_threshold,
        help_heading = "Common Options"
    )]
    pub thresholds: Option<Vec<ThresholdRule>>,

    /// Pause between a worker's iterations (supports ms/s/m/h, 0 disables)
    #[arg(
        long = "think-time",
        default_value = DEFAULT_THINK_TIME,
        env = "SCRAPEPROBE_THINK_TIME",
        value_parser = parse_think_time
    )]
    pub think_time: Duration,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = DEFAULT_REQUEST_TIMEOUT,
        env = "SCRAPEPROBE_TIMEOUT",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Connection timeout (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = DEFAULT_CONNECT_TIMEOUT,
        env = "SCRAPEPROBE_CONNECT_TIMEOUT",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// How often the worker level is recomputed (supports ms/s/m/h)
    #[arg(
        long = "tick-interval",
        default_value = DEFAULT_TICK_INTERVAL,
        env = "SCRAPEPROBE_TICK_INTERVAL",
        value_parser = parse_duration_arg
    )]
    pub tick_interval: Duration,

    /// Response body bytes kept for substring checks
    #[arg(
        long = "max-body-bytes",
        default_value = DEFAULT_MAX_BODY_BYTES,
        env = "SCRAPEPROBE_MAX_BODY_BYTES",
        value_parser = parse_positive_usize
    )]
    pub max_body_bytes: PositiveUsize,

    /// User-Agent header sent with every probe
    #[arg(
        long = "user-agent",
        default_value = DEFAULT_USER_AGENT,
        env = "SCRAPEPROBE_USER_AGENT"
    )]
    pub user_agent: String,

    /// Path to config file (TOML/JSON). Defaults to ./scrapeprobe.toml or ./scrapeprobe.json if present.
    #[arg(long, env = "SCRAPEPROBE_CONFIG", help_heading = "Common Options")]
    pub config: Option<String>,

    /// Write the final verdict as JSON to this path
    #[arg(long = "summary-export", env = "SCRAPEPROBE_SUMMARY_EXPORT")]
    pub summary_export: Option<String>,

    /// Suppress the text report
    #[arg(long, short = 'q', env = "SCRAPEPROBE_QUIET", value_parser = parse_bool_env)]
    pub quiet: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by SCRAPEPROBE_LOG/RUST_LOG)
    #[arg(long, short = 'v', alias = "debug", help_heading = "Common Options")]
    pub verbose: bool,

    #[arg(skip)]
    pub targets: Option<Vec<TargetConfig>>,
}

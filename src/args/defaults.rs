pub(crate) const DEFAULT_USER_AGENT: &str = concat!("scrapeprobe/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_THINK_TIME: &str = "1s";
pub(crate) const DEFAULT_REQUEST_TIMEOUT: &str = "10s";
pub(crate) const DEFAULT_CONNECT_TIMEOUT: &str = "5s";
pub(crate) const DEFAULT_TICK_INTERVAL: &str = "100ms";
pub(crate) const DEFAULT_MAX_BODY_BYTES: &str = "4194304";

/// Upper bound on a stage target; each unit is a spawned worker task.
pub(crate) const MAX_STAGE_TARGET: u64 = 10_000;

use url::Url;

use crate::args::Preset;
use crate::checks::ThresholdRule;
use crate::load::{DriverSettings, LoadProfile};
use crate::probe::{ProbeSettings, ProbeTarget};

/// Validated, immutable description of a run.
#[derive(Debug, Clone)]
pub(crate) struct RunPlan {
    pub(crate) preset: Preset,
    pub(crate) base_url: Url,
    pub(crate) profile: LoadProfile,
    pub(crate) targets: Vec<ProbeTarget>,
    pub(crate) thresholds: Vec<ThresholdRule>,
    pub(crate) driver: DriverSettings,
    pub(crate) probe: ProbeSettings,
    pub(crate) summary_export: Option<String>,
    pub(crate) quiet: bool,
}

use url::Url;

use crate::checks::{CheckKind, CheckSpec};

/// Endpoint probed once per worker iteration, with its named expectations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub name: String,
    pub url: Url,
    pub checks: Vec<CheckSpec>,
}

impl ProbeTarget {
    #[must_use]
    pub const fn new(name: String, url: Url, checks: Vec<CheckSpec>) -> Self {
        Self { name, url, checks }
    }

    #[must_use]
    pub fn expected_status(&self) -> Option<u16> {
        self.checks.iter().find_map(|check| match check.kind {
            CheckKind::Status(code) => Some(code),
            CheckKind::BodyContains(_) => None,
        })
    }

    pub fn expected_body(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().filter_map(|check| match &check.kind {
            CheckKind::BodyContains(fragment) => Some(fragment.as_str()),
            CheckKind::Status(_) => None,
        })
    }
}

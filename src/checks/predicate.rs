use crate::probe::ProbeResult;

/// Pure function of a single probe result.
pub type Predicate = Box<dyn Fn(&ProbeResult) -> bool + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    Status(u16),
    BodyContains(String),
}

impl CheckKind {
    #[must_use]
    pub fn predicate(&self) -> Predicate {
        match self {
            CheckKind::Status(code) => status_is(*code),
            CheckKind::BodyContains(fragment) => body_contains(fragment.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSpec {
    pub name: String,
    pub kind: CheckKind,
}

impl CheckSpec {
    pub fn new(name: impl Into<String>, kind: CheckKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[must_use]
pub fn status_is(expected: u16) -> Predicate {
    Box::new(move |result: &ProbeResult| result.status == expected)
}

pub fn body_contains(fragment: impl Into<String>) -> Predicate {
    let fragment = fragment.into();
    Box::new(move |result: &ProbeResult| result.body.contains(fragment.as_str()))
}

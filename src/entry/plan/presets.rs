use crate::args::Preset;
use crate::checks::{CheckKind, CheckSpec};

pub(super) struct PresetDefinition {
    /// Environment variable consulted when no URL is configured.
    pub(super) url_env: &'static str,
    pub(super) default_url: &'static str,
    pub(super) targets: &'static [PresetTarget],
}

pub(super) struct PresetTarget {
    pub(super) name: &'static str,
    pub(super) path: &'static str,
    checks: &'static [(&'static str, Expect)],
}

enum Expect {
    Status(u16),
    Body(&'static str),
}

impl PresetTarget {
    pub(super) fn checks(&self) -> Vec<CheckSpec> {
        self.checks
            .iter()
            .map(|(name, expect)| {
                let kind = match expect {
                    Expect::Status(code) => CheckKind::Status(*code),
                    Expect::Body(fragment) => CheckKind::BodyContains((*fragment).to_owned()),
                };
                CheckSpec::new(*name, kind)
            })
            .collect()
    }
}

const ALLOY: PresetDefinition = PresetDefinition {
    url_env: "ALLOY_URL",
    default_url: "http://localhost:12345",
    targets: &[
        PresetTarget {
            name: "ready",
            path: "/-/ready",
            checks: &[("alloy is ready", Expect::Status(200))],
        },
        PresetTarget {
            name: "metrics",
            path: "/metrics",
            checks: &[
                ("metrics endpoint returns 200", Expect::Status(200)),
                (
                    "metrics contain alloy_build_info",
                    Expect::Body("alloy_build_info"),
                ),
                (
                    "metrics contain remote_write data",
                    Expect::Body("prometheus_remote_storage_samples_total"),
                ),
                (
                    "scrape targets active",
                    Expect::Body("scrape_samples_scraped"),
                ),
            ],
        },
    ],
};

const ORACLEDB_EXPORTER: PresetDefinition = PresetDefinition {
    url_env: "EXPORTER_URL",
    default_url: "http://localhost:9161",
    targets: &[PresetTarget {
        name: "metrics",
        path: "/metrics",
        checks: &[
            ("exporter metrics return 200", Expect::Status(200)),
            ("oracledb is up", Expect::Body("oracledb_up")),
            (
                "oracledb activity metrics present",
                Expect::Body("oracledb_activity_execute_count"),
            ),
        ],
    }],
};

pub(super) const fn definition(preset: Preset) -> &'static PresetDefinition {
    match preset {
        Preset::Alloy => &ALLOY,
        Preset::OracledbExporter => &ORACLEDB_EXPORTER,
    }
}

pub(super) const DEFAULT_STAGES: [(u64, u64); 3] = [(30, 10), (60, 10), (30, 0)];

pub(super) const DEFAULT_THRESHOLDS: [(&str, &str); 2] = [
    ("http_req_duration", "p(95)<500"),
    ("http_req_failed", "rate<0.01"),
];

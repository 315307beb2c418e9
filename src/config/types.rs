use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw on-disk configuration. Every field is optional except the test
/// list; defaults and validation are applied by [`super::build_suite`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_timeout: Option<u64>,
    #[serde(default)]
    pub tests: Vec<TestEntry>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TestEntry {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerEntry>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Defaults to the owning test's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub command: Vec<String>,
    /// Host probed for readiness. Defaults to localhost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub port: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Starter config written by `wrkbench init`.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            duration: Some(30),
            connections: Some(1000),
            threads: Some(8),
            warmup: Some(5),
            output_dir: Some(PathBuf::from("results")),
            ready_timeout: Some(30),
            tests: vec![
                TestEntry {
                    name: "baseline".to_owned(),
                    url: "http://localhost:8080/".to_owned(),
                    ..TestEntry::default()
                },
                TestEntry {
                    name: "api-under-test".to_owned(),
                    url: "http://localhost:3000/api/items".to_owned(),
                    duration: Some(60),
                    connections: Some(200),
                    server: Some(ServerEntry {
                        command: vec!["./target/release/my-server".to_owned()],
                        port: 3000,
                        env: [("RUST_LOG".to_owned(), "warn".to_owned())]
                            .into_iter()
                            .collect(),
                        ..ServerEntry::default()
                    }),
                    ..TestEntry::default()
                },
            ],
            ..Self::default()
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TestOverrides;

/// A server the orchestrator launches and tears down around one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    /// Identifier used for log file naming; filesystem-safe.
    pub name: String,
    /// Launch command as an ordered argument sequence.
    pub command: Vec<String>,
    /// Host the readiness probe connects to.
    pub host: String,
    /// Port the readiness probe connects to.
    pub port: u16,
    /// Environment overrides merged over the ambient environment.
    pub env: BTreeMap<String, String>,
}

/// One declared test. A test without a server targets an endpoint that is
/// already running externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSpec {
    pub name: String,
    pub url: String,
    pub server: Option<ServerSpec>,
    pub overrides: TestOverrides,
}

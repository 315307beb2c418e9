use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::model::{GlobalSettings, ServerSpec, TestSpec, TestOverrides};

use super::types::{ConfigFile, ServerEntry, TestEntry};

/// Host probed for readiness when a server entry omits one.
const DEFAULT_SERVER_HOST: &str = "localhost";

/// A validated, ready-to-run suite.
#[derive(Debug, Clone)]
pub struct Suite {
    pub settings: GlobalSettings,
    pub tests: Vec<TestSpec>,
}

/// Validates a raw config and resolves it into a [`Suite`].
///
/// # Errors
///
/// Returns the first validation failure: an empty test list, duplicate or
/// filesystem-unsafe test names, non-positive numeric settings, more
/// threads than connections, a malformed URL, or a malformed server entry.
pub fn build_suite(file: &ConfigFile) -> Result<Suite, ConfigError> {
    if file.tests.is_empty() {
        return Err(ConfigError::NoTests);
    }

    let defaults = GlobalSettings::default();
    let settings = GlobalSettings {
        duration: file.duration.unwrap_or(defaults.duration),
        connections: file.connections.unwrap_or(defaults.connections),
        threads: file.threads.unwrap_or(defaults.threads),
        warmup: file.warmup.unwrap_or(defaults.warmup),
        output_dir: file.output_dir.clone().unwrap_or(defaults.output_dir),
        script: file.script.clone(),
        ready_timeout: file.ready_timeout.unwrap_or(defaults.ready_timeout),
    };
    check_settings(&settings, String::new())?;

    let mut seen = BTreeSet::new();
    let mut tests = Vec::with_capacity(file.tests.len());
    for entry in &file.tests {
        let test = resolve_test(entry, &settings)?;
        if !seen.insert(test.name.clone()) {
            return Err(ConfigError::DuplicateTestName {
                name: test.name.clone(),
            });
        }
        tests.push(test);
    }

    Ok(Suite { settings, tests })
}

fn check_settings(settings: &GlobalSettings, scope: String) -> Result<(), ConfigError> {
    // Warmup may be zero; it only disables the warmup pass.
    for (field, value) in [
        ("duration", settings.duration),
        ("connections", settings.connections),
        ("threads", settings.threads),
        ("ready_timeout", settings.ready_timeout),
    ] {
        if value == 0 {
            return Err(ConfigError::FieldMustBePositive {
                field,
                scope: scope.clone(),
            });
        }
    }
    if settings.threads > settings.connections {
        return Err(ConfigError::ThreadsExceedConnections {
            threads: settings.threads,
            connections: settings.connections,
            scope,
        });
    }
    Ok(())
}

fn resolve_test(entry: &TestEntry, global: &GlobalSettings) -> Result<TestSpec, ConfigError> {
    if entry.name.is_empty() || !entry.name.chars().all(is_safe_name_char) {
        return Err(ConfigError::UnsafeTestName {
            name: entry.name.clone(),
        });
    }

    url::Url::parse(&entry.url).map_err(|source| ConfigError::InvalidUrl {
        name: entry.name.clone(),
        source,
    })?;

    let overrides = TestOverrides {
        duration: entry.duration,
        connections: entry.connections,
        threads: entry.threads,
        warmup: entry.warmup,
        script: entry.script.clone(),
    };
    let effective = overrides.merge(global);
    check_settings(
        &GlobalSettings {
            duration: effective.duration,
            connections: effective.connections,
            threads: effective.threads,
            warmup: effective.warmup,
            output_dir: global.output_dir.clone(),
            script: effective.script.clone(),
            ready_timeout: effective.ready_timeout,
        },
        format!(" for test '{}'", entry.name),
    )?;
    if let Some(script) = effective.script.as_deref()
        && !script.exists()
    {
        tracing::warn!(test = %entry.name, script = %script.display(), "Script path does not exist");
    }

    let server = entry
        .server
        .as_ref()
        .map(|server| resolve_server(server, &entry.name))
        .transpose()?;

    Ok(TestSpec {
        name: entry.name.clone(),
        url: entry.url.clone(),
        server,
        overrides,
    })
}

fn resolve_server(entry: &ServerEntry, test_name: &str) -> Result<ServerSpec, ConfigError> {
    if entry.command.is_empty() || entry.command.iter().any(String::is_empty) {
        return Err(ConfigError::EmptyServerCommand {
            name: test_name.to_owned(),
        });
    }
    if entry.port == 0 {
        return Err(ConfigError::ServerPortZero {
            name: test_name.to_owned(),
        });
    }
    Ok(ServerSpec {
        name: entry
            .name
            .clone()
            .unwrap_or_else(|| test_name.to_owned()),
        command: entry.command.clone(),
        host: entry
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_owned()),
        port: entry.port,
        env: entry.env.clone(),
    })
}

/// Test names become artifact file names, so they are restricted to
/// characters safe on every supported filesystem.
const fn is_safe_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

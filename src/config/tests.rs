use std::io::Write as _;
use std::path::PathBuf;

use crate::error::ConfigError;

use super::types::{ConfigFile, ServerEntry, TestEntry};
use super::{build_suite, load_config, load_config_file};

const YAML_CONFIG: &str = "\
duration: 15
connections: 100
threads: 4
warmup: 0
output_dir: bench-results
tests:
  - name: root
    url: http://localhost:8080/
  - name: api
    url: http://localhost:3000/api/items
    duration: 60
    server:
      command: [\"./server\", \"--quiet\"]
      port: 3000
      env:
        RUST_LOG: warn
";

fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> Result<PathBuf, String> {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes())
        .map_err(|err| err.to_string())?;
    Ok(path)
}

#[test]
fn yaml_config_parses_and_validates() -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, "bench.yaml", YAML_CONFIG)?;

    let file = load_config_file(&path).map_err(|err| err.to_string())?;
    let suite = build_suite(&file).map_err(|err| err.to_string())?;

    if suite.settings.duration != 15 || suite.settings.warmup != 0 {
        return Err(format!("Unexpected settings: {:?}", suite.settings));
    }
    if suite.settings.output_dir != PathBuf::from("bench-results") {
        return Err(format!("Unexpected output dir: {:?}", suite.settings.output_dir));
    }
    if suite.tests.len() != 2 {
        return Err(format!("Expected 2 tests, got {}", suite.tests.len()));
    }
    let api = suite.tests.get(1).ok_or("Missing second test")?;
    if api.overrides.duration != Some(60) {
        return Err(format!("Override lost: {:?}", api.overrides));
    }
    let server = api.server.as_ref().ok_or("Missing server spec")?;
    if server.name != "api" || server.host != "localhost" {
        return Err(format!("Server defaults not applied: {:?}", server));
    }
    if server.env.get("RUST_LOG").map(String::as_str) != Some("warn") {
        return Err(format!("Server env lost: {:?}", server.env));
    }
    Ok(())
}

#[test]
fn json_config_parses() -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(
        &dir,
        "bench.json",
        r#"{"connections": 50, "tests": [{"name": "only", "url": "http://localhost:9000/"}]}"#,
    )?;

    let file = load_config_file(&path).map_err(|err| err.to_string())?;
    if file.connections != Some(50) || file.tests.len() != 1 {
        return Err(format!("Unexpected config: {:?}", file));
    }
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, "bench.toml", "tests = []")?;

    match load_config_file(&path) {
        Err(ConfigError::UnsupportedExtension { ext }) if ext == "toml" => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}

#[test]
fn missing_explicit_config_is_an_error() -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.yaml");

    match load_config(Some(&path)) {
        Err(ConfigError::ReadConfig { .. }) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}

fn minimal(name: &str) -> TestEntry {
    TestEntry {
        name: name.to_owned(),
        url: "http://localhost:8080/".to_owned(),
        ..TestEntry::default()
    }
}

#[test]
fn empty_test_list_is_rejected() -> Result<(), String> {
    match build_suite(&ConfigFile::default()) {
        Err(ConfigError::NoTests) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}

#[test]
fn duplicate_test_names_are_rejected() -> Result<(), String> {
    let file = ConfigFile {
        tests: vec![minimal("same"), minimal("same")],
        ..ConfigFile::default()
    };
    match build_suite(&file) {
        Err(ConfigError::DuplicateTestName { name }) if name == "same" => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}

#[test]
fn unsafe_test_names_are_rejected() -> Result<(), String> {
    for bad in ["with space", "slash/name", ""] {
        let file = ConfigFile {
            tests: vec![minimal(bad)],
            ..ConfigFile::default()
        };
        match build_suite(&file) {
            Err(ConfigError::UnsafeTestName { .. }) => {}
            other => return Err(format!("'{}' accepted: {:?}", bad, other.map(|_| ()))),
        }
    }
    Ok(())
}

#[test]
fn zero_duration_is_rejected_but_zero_warmup_is_fine() -> Result<(), String> {
    let file = ConfigFile {
        duration: Some(0),
        tests: vec![minimal("t")],
        ..ConfigFile::default()
    };
    match build_suite(&file) {
        Err(ConfigError::FieldMustBePositive { field: "duration", .. }) => {}
        other => return Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }

    let file = ConfigFile {
        warmup: Some(0),
        tests: vec![minimal("t")],
        ..ConfigFile::default()
    };
    build_suite(&file).map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn per_test_threads_must_not_exceed_connections() -> Result<(), String> {
    let file = ConfigFile {
        connections: Some(100),
        threads: Some(4),
        tests: vec![TestEntry {
            connections: Some(2),
            ..minimal("narrow")
        }],
        ..ConfigFile::default()
    };
    match build_suite(&file) {
        Err(ConfigError::ThreadsExceedConnections { threads: 4, connections: 2, scope })
            if scope.contains("narrow") =>
        {
            Ok(())
        }
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}

#[test]
fn malformed_urls_are_rejected() -> Result<(), String> {
    let file = ConfigFile {
        tests: vec![TestEntry {
            url: "not a url".to_owned(),
            ..minimal("bad-url")
        }],
        ..ConfigFile::default()
    };
    match build_suite(&file) {
        Err(ConfigError::InvalidUrl { name, .. }) if name == "bad-url" => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}

#[test]
fn malformed_server_entries_are_rejected() -> Result<(), String> {
    let file = ConfigFile {
        tests: vec![TestEntry {
            server: Some(ServerEntry {
                port: 3000,
                ..ServerEntry::default()
            }),
            ..minimal("no-command")
        }],
        ..ConfigFile::default()
    };
    match build_suite(&file) {
        Err(ConfigError::EmptyServerCommand { .. }) => {}
        other => return Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }

    let file = ConfigFile {
        tests: vec![TestEntry {
            server: Some(ServerEntry {
                command: vec!["./server".to_owned()],
                port: 0,
                ..ServerEntry::default()
            }),
            ..minimal("no-port")
        }],
        ..ConfigFile::default()
    };
    match build_suite(&file) {
        Err(ConfigError::ServerPortZero { .. }) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other.map(|_| ()))),
    }
}

#[test]
fn sample_config_validates_cleanly() -> Result<(), String> {
    let suite = build_suite(&ConfigFile::sample()).map_err(|err| err.to_string())?;
    if suite.tests.len() != 2 {
        return Err(format!("Expected 2 sample tests, got {}", suite.tests.len()));
    }
    Ok(())
}

#[test]
fn sample_config_round_trips_through_yaml() -> Result<(), String> {
    let rendered = serde_yaml::to_string(&ConfigFile::sample()).map_err(|err| err.to_string())?;
    let parsed: ConfigFile = serde_yaml::from_str(&rendered).map_err(|err| err.to_string())?;
    if parsed.tests.len() != 2 || parsed.duration != Some(30) {
        return Err(format!("Round trip lost data: {:?}", parsed));
    }
    Ok(())
}

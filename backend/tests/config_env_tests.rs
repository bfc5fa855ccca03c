//! Server configuration loading from the environment and TOML files.

mod support;

use std::io::Write;
use std::path::PathBuf;

use shotmarker::config::ServerConfig;
use support::with_scoped_env;

const ALL_VARS: [&str; 6] = [
    "HOST",
    "PORT",
    "SHOTMARKER_CONFIG",
    "SHOTMARKER_OUTPUT_DIR",
    "SHOTMARKER_MAX_UPLOAD_BYTES",
    "SHOTMARKER_PLOT_RETENTION_SECS",
];

fn cleared<'a>() -> Vec<(&'a str, Option<&'a str>)> {
    ALL_VARS.iter().map(|k| (*k, None)).collect()
}

#[test]
fn test_from_env_defaults() {
    let config = with_scoped_env(&cleared(), ServerConfig::from_env).unwrap();
    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_from_env_overrides() {
    let mut changes = cleared();
    changes.extend([
        ("HOST", Some("127.0.0.1")),
        ("PORT", Some("9100")),
        ("SHOTMARKER_OUTPUT_DIR", Some("/var/lib/shotmarker")),
        ("SHOTMARKER_MAX_UPLOAD_BYTES", Some("2048")),
        ("SHOTMARKER_PLOT_RETENTION_SECS", Some("60")),
    ]);

    let config = with_scoped_env(&changes, ServerConfig::from_env).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:9100");
    assert_eq!(config.output_dir, PathBuf::from("/var/lib/shotmarker"));
    assert_eq!(config.max_upload_bytes, 2048);
    assert_eq!(config.plot_retention_secs, 60);
}

#[test]
fn test_invalid_port_is_reported() {
    let mut changes = cleared();
    changes.push(("PORT", Some("eighty")));

    let err = with_scoped_env(&changes, ServerConfig::from_env).unwrap_err();
    assert!(err.contains("PORT"));
}

#[test]
fn test_oversized_retention_is_rejected() {
    let mut changes = cleared();
    changes.push(("SHOTMARKER_PLOT_RETENTION_SECS", Some("18446744073709551615")));

    let err = with_scoped_env(&changes, ServerConfig::from_env).unwrap_err();
    assert!(err.contains("plot retention"));
}

#[test]
fn test_load_reads_config_file_then_env() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 9200\nmax_upload_bytes = 4096\n\n[render]\nwidth = 640.0").unwrap();
    let path = file.path().to_string_lossy().to_string();

    let mut changes = cleared();
    changes.push(("SHOTMARKER_CONFIG", Some(path.as_str())));
    changes.push(("SHOTMARKER_MAX_UPLOAD_BYTES", Some("8192")));

    let config = with_scoped_env(&changes, ServerConfig::load).unwrap();
    assert_eq!(config.port, 9200);
    assert_eq!(config.max_upload_bytes, 8192);
    assert_eq!(config.render.width, 640.0);
}

#[test]
fn test_load_missing_config_file() {
    let mut changes = cleared();
    changes.push(("SHOTMARKER_CONFIG", Some("/nonexistent/shotmarker.toml")));

    let err = with_scoped_env(&changes, ServerConfig::load).unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}
